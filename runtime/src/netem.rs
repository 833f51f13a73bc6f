//! Link emulation through `tc qdisc ... netem` inside network namespaces.

use super::command;
use super::errors::*;
use super::Setting;

/// One side of the emulated link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    /// Network namespace name.
    pub namespace: String,

    /// Device inside the namespace carrying the netem qdisc.
    pub device: String,
}

impl Endpoint {
    /// Creates a new `Endpoint`.
    pub fn new(namespace: &str, device: &str) -> Self {
        Endpoint {
            namespace: namespace.to_string(),
            device: device.to_string(),
        }
    }
}

/// Builds the argument vector that reconfigures the root netem qdisc of
/// `endpoint`. The `loss` argument is left out at 0%.
pub fn qdisc_command(endpoint: &Endpoint, loss: f64, delay: &str, limit: u32, rate: &str) -> Vec<String> {
    let mut args = vec![
        "ip".to_string(),
        "netns".to_string(),
        "exec".to_string(),
        endpoint.namespace.clone(),
        "tc".to_string(),
        "qdisc".to_string(),
        "change".to_string(),
        "dev".to_string(),
        endpoint.device.clone(),
        "root".to_string(),
        "netem".to_string(),
        "limit".to_string(),
        limit.to_string(),
    ];
    if loss != 0.0 {
        args.push("loss".to_string());
        args.push(format!("{}%", loss));
    }
    args.push("delay".to_string());
    args.push(delay.to_string());
    args.push("rate".to_string());
    args.push(rate.to_string());
    args
}

/// Applies link conditions to both ends of the emulated link.
pub trait Shaper {
    /// Sets packet loss (percent) and one-way delay on both endpoints.
    fn shape(&mut self, loss: f64, delay: &str) -> Result<()>;
}

/// The client/server namespace pair, shaped with `tc`.
#[derive(Debug, Clone)]
pub struct NetemPair {
    client: Endpoint,
    server: Endpoint,
    limit: u32,
    rate: String,
}

impl NetemPair {
    /// Creates a new `NetemPair` from the namespaces and devices in `setting`.
    pub fn new(setting: &Setting) -> Self {
        NetemPair {
            client: Endpoint::new(&setting.client_namespace, &setting.client_device),
            server: Endpoint::new(&setting.server_namespace, &setting.server_device),
            limit: setting.limit,
            rate: setting.rate.clone(),
        }
    }

    /// Argument vectors for the client and the server, in run order.
    pub fn commands(&self, loss: f64, delay: &str) -> [Vec<String>; 2] {
        [
            qdisc_command(&self.client, loss, delay, self.limit, &self.rate),
            qdisc_command(&self.server, loss, delay, self.limit, &self.rate),
        ]
    }
}

impl Shaper for NetemPair {
    fn shape(&mut self, loss: f64, delay: &str) -> Result<()> {
        for args in self.commands(loss, delay).iter() {
            command::run(args)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_qdisc_command_with_loss() {
        let client = Endpoint::new("client_namespace", "client_veth");
        let args = qdisc_command(&client, 0.1, "20.000ms", 1000, "1000mbit");
        assert_eq!(
            command::display(&args),
            "ip netns exec client_namespace tc qdisc change dev client_veth root netem \
             limit 1000 loss 0.1% delay 20.000ms rate 1000mbit"
        );
    }

    #[test]
    fn test_qdisc_command_without_loss() {
        let server = Endpoint::new("server_namespace", "server_veth");
        let args = qdisc_command(&server, 0.0, "20.000ms", 1000, "1000mbit");
        assert!(!args.contains(&"loss".to_string()));
        assert_eq!(
            command::display(&args),
            "ip netns exec server_namespace tc qdisc change dev server_veth root netem \
             limit 1000 delay 20.000ms rate 1000mbit"
        );
    }

    #[test]
    fn test_pair_from_setting() {
        let pair = NetemPair::new(&Setting::default());
        let [client, server] = pair.commands(18.0, "20.000ms");
        assert_eq!(client[3], "client_namespace");
        assert_eq!(server[3], "server_namespace");
        assert_eq!(server[8], "server_veth");
        assert!(client.contains(&"18%".to_string()));
    }
}
