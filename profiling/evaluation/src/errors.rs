//! Error types for the evaluation crate.

/// Creates the Error, ErrorKind, ResultExt, and Result types
error_chain! {
    errors {
        Plot(t: String) {
            description("error in rendering a chart")
            display("failed to render chart: {}", t)
        }
        NoData(path: String) {
            description("no result files found")
            display("no result files found under {}", path)
        }
    }

    foreign_links {
        Io(::std::io::Error);
        Csv(::csv::Error);
    }
}

/// Wraps a plotting backend error.
pub fn plot_error<E: ::std::fmt::Display>(err: E) -> Error {
    Error::from_kind(ErrorKind::Plot(err.to_string()))
}

/// Logs `err` and every error that caused it, outermost first.
pub fn log_chain(err: &Error) {
    error!("{}", err);
    for cause in err.iter().skip(1) {
        error!("caused by: {}", cause);
    }
}
