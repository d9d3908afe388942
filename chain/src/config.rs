//! Connection configuration.

/// Node URL used when neither the CLI nor the environment provides one.
pub const DEFAULT_RPC_URL: &str = "http://127.0.0.1:5050";

/// Settings for [`crate::ChainConnection::connect`].
#[derive(Clone, Debug)]
pub struct ChainConfig {
    pub rpc_url: String,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
        }
    }
}

/// Resolves the chain node URL.
///
/// Supported:
///   --rpc-url <URL>
///   --rpc-url=<URL>
///   GRIDWALK_RPC_URL environment variable (pass its value as `env_url`)
///
/// Falls back to [`DEFAULT_RPC_URL`].
pub fn resolve_rpc_url(
    args: impl IntoIterator<Item = String>,
    env_url: Option<String>,
) -> String {
    flag_value(args, "--rpc-url")
        .or(env_url)
        .unwrap_or_else(|| DEFAULT_RPC_URL.to_string())
}

/// Resolves the path of an optional burner seed payload file.
///
/// Supported:
///   --burners-file <path>
///   --burners-file=<path>
pub fn resolve_burners_file(args: impl IntoIterator<Item = String>) -> Option<String> {
    flag_value(args, "--burners-file")
}

/// Returns the value of `--flag <value>` or `--flag=<value>`, if present.
fn flag_value(args: impl IntoIterator<Item = String>, flag: &str) -> Option<String> {
    let prefixed = format!("{flag}=");
    let mut take_next = false;

    for arg in args {
        if take_next {
            return Some(arg);
        }
        if arg == flag {
            take_next = true;
        } else if let Some(value) = arg.strip_prefix(&prefixed) {
            return Some(value.to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn cli_flag_wins_over_env_and_default() {
        let url = resolve_rpc_url(
            args(&["--rpc-url", "http://node:9000"]),
            Some("http://env:1".into()),
        );
        assert_eq!(url, "http://node:9000");

        let url = resolve_rpc_url(args(&["--rpc-url=http://node:9001"]), None);
        assert_eq!(url, "http://node:9001");
    }

    #[test]
    fn env_wins_over_default() {
        let url = resolve_rpc_url(args(&[]), Some("http://env:1".into()));
        assert_eq!(url, "http://env:1");
    }

    #[test]
    fn default_applies_last() {
        assert_eq!(resolve_rpc_url(args(&[]), None), DEFAULT_RPC_URL);
        assert_eq!(resolve_rpc_url(args(&["--other", "x"]), None), DEFAULT_RPC_URL);
    }

    #[test]
    fn burners_file_forms() {
        assert_eq!(
            resolve_burners_file(args(&["--burners-file", "seed.json"])),
            Some("seed.json".to_string())
        );
        assert_eq!(
            resolve_burners_file(args(&["--burners-file=seed.json"])),
            Some("seed.json".to_string())
        );
        assert_eq!(resolve_burners_file(args(&[])), None);
    }

    #[test]
    fn dangling_flag_yields_nothing() {
        assert_eq!(resolve_rpc_url(args(&["--rpc-url"]), None), DEFAULT_RPC_URL);
    }
}
