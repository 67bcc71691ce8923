//! Command-line configuration for htprobe.

use clap::Parser;

/// Send HTTP probe requests at regular intervals.
#[derive(Parser, Debug, Clone)]
#[command(name = "htprobe", version, about)]
pub struct Options {
    /// Target URL to probe
    pub url: String,

    /// Interval between requests in milliseconds
    #[arg(short, long, default_value_t = 1000, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: u64,

    /// Number of requests to make (0 = unlimited)
    #[arg(short, long, default_value_t = 0)]
    pub limit: u64,

    /// Number of probe lines shown in the live view
    #[arg(short, long, default_value_t = 25)]
    pub pager: usize,

    /// HTTP request method
    #[arg(short, long, default_value = "GET")]
    pub method: String,

    /// jq-compatible filter for JSON responses
    #[arg(short, long)]
    pub json: Option<String>,

    /// Allow insecure connections (skip TLS certificate verification)
    #[arg(short = 'k', long)]
    pub insecure: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts = Options::parse_from(["htprobe", "http://example.com"]);
        assert_eq!(opts.url, "http://example.com");
        assert_eq!(opts.interval, 1000);
        assert_eq!(opts.limit, 0);
        assert_eq!(opts.pager, 25);
        assert_eq!(opts.method, "GET");
        assert!(opts.json.is_none());
        assert!(!opts.insecure);
    }

    #[test]
    fn test_short_flags() {
        let opts = Options::parse_from([
            "htprobe",
            "-i",
            "250",
            "-l",
            "5",
            "-p",
            "10",
            "-m",
            "HEAD",
            "-j",
            ".a",
            "-k",
            "https://example.com/health",
        ]);
        assert_eq!(opts.interval, 250);
        assert_eq!(opts.limit, 5);
        assert_eq!(opts.pager, 10);
        assert_eq!(opts.method, "HEAD");
        assert_eq!(opts.json.as_deref(), Some(".a"));
        assert!(opts.insecure);
    }

    #[test]
    fn test_zero_interval_rejected() {
        assert!(Options::try_parse_from(["htprobe", "-i", "0", "http://example.com"]).is_err());
    }

    #[test]
    fn test_url_required() {
        assert!(Options::try_parse_from(["htprobe"]).is_err());
    }
}
