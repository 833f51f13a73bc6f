//! Error types for the experiment driver.

/// Creates the Error, ErrorKind, ResultExt, and Result types
error_chain! {
    errors {
        CommandFailed(cmd: String, status: String) {
            description("external command failed")
            display("command `{}` failed: {}", cmd, status)
        }
        TimerOutput(output: String) {
            description("unparsable output from the timing binary")
            display("timing binary printed an unparsable value: {:?}", output)
        }
        InvalidSetting(reason: String) {
            description("invalid setting")
            display("invalid setting: {}", reason)
        }
    }

    foreign_links {
        Io(::std::io::Error);
        Csv(::csv::Error);
        Toml(::toml::de::Error);
        ThreadPool(::rayon::ThreadPoolBuildError);
    }
}

/// Logs `err` and every error that caused it, outermost first.
pub fn log_chain(err: &Error) {
    error!("{}", err);
    for cause in err.iter().skip(1) {
        error!("caused by: {}", cause);
    }
}
