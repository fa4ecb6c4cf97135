use clap::error::ErrorKind;
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use std::ffi::OsString;
use std::io;
use whoiss::{print_results, DnsClient, Input, Lookup, Result, WhoisClient, WhoissError};

fn create_clap_app(version: &'static str) -> Command {
    Command::new("whoiss")
        .version(version)
        .about("Looks up WHOIS registration and DNS records (A, AAAA, MX) for a list of sites")
        .override_usage("whoiss example.com http://www.example.org/page")
        .arg(
            Arg::new("sites")
                .help("Host names or http(s) URLs")
                .action(ArgAction::Append)
                .num_args(0..),
        )
        .arg(
            Arg::new("input-file")
                .help("whoiss -i <sites.txt>\nReads additional sites, one per line. Use - for stdin.")
                .short('i')
                .long("input-file"),
        )
        .arg(
            Arg::new("resolvers")
                .help("whoiss -r <resolvers.txt>\nThe default is the system resolver configuration.")
                .short('r')
                .long("resolvers"),
        )
        .arg(
            Arg::new("whois-servers")
                .help("whoiss -w <servers.json>\nA node-whois style server list replacing the built-in one.")
                .short('w')
                .long("whois-servers"),
        )
        .arg(
            Arg::new("concurrency")
                .help("whoiss -c 50 example.com\nLookups in flight at once, 0 for no limit.")
                .short('c')
                .long("concurrency")
                .default_value("320")
                .value_parser(value_parser!(usize)),
        )
        .arg(
            Arg::new("timeout")
                .help("whoiss -t 10 example.com")
                .short('t')
                .long("timeout")
                .default_value("5")
                .value_parser(value_parser!(u64)),
        )
        .arg(
            Arg::new("verbosity")
                .help("whoiss -v info example.com")
                .short('v')
                .long("verbosity"),
        )
}

fn init_logging(matches: &ArgMatches) -> Result<()> {
    if let Some(filter) = matches.get_one::<String>("verbosity") {
        tracing_subscriber::fmt()
            .with_env_filter(filter.as_str())
            .with_writer(io::stderr)
            .try_init()
            .map_err(|e| WhoissError::Logging(e.to_string()))?;
    }
    Ok(())
}

// Bad arguments come back as `WhoissError::Cli` so they take the same exit path as any other
// top-level failure.
fn parse_args<I, T>(args: I) -> Result<ArgMatches>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    Ok(create_clap_app(env!("CARGO_PKG_VERSION")).try_get_matches_from(args)?)
}

// --help and --version still go through clap so they print normally and exit 0.
fn is_informational(e: &clap::Error) -> bool {
    matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion)
}

async fn run() -> Result<()> {
    let matches = match parse_args(std::env::args_os()) {
        Ok(matches) => matches,
        Err(WhoissError::Cli(e)) if is_informational(&e) => e.exit(),
        Err(e) => return Err(e),
    };
    init_logging(&matches)?;

    let concurrency = matches.get_one::<usize>("concurrency").copied().unwrap_or(320);
    let timeout = matches.get_one::<u64>("timeout").copied().unwrap_or(5);
    let args: Vec<String> = matches
        .get_many::<String>("sites")
        .map(|sites| sites.cloned().collect())
        .unwrap_or_default();
    let input_file = matches.get_one::<String>("input-file").map(String::as_str);
    let targets = Input::new(args, input_file)?.sites();

    // if the user specified a list of resolvers, use them.
    let mut dns = DnsClient::builder().timeout(timeout);
    if let Some(resolvers) = matches.get_one::<String>("resolvers") {
        dns = dns.load_resolvers(resolvers)?;
    }

    let whois = match matches.get_one::<String>("whois-servers") {
        Some(path) => WhoisClient::from_path(path).await?,
        None => WhoisClient::new()?,
    };

    let receiver = Lookup::new(whois.timeout(timeout), dns.build())
        .concurrency(concurrency)
        .run(targets);

    let mut out = tokio::io::stdout();
    print_results(receiver, &mut out).await?;
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(e) = run().await {
        println!("{:?}", e);
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_concurrency_is_an_error() {
        let err = parse_args(["whoiss", "-c", "abc", "example.com"]).unwrap_err();
        match err {
            WhoissError::Cli(e) => assert!(!is_informational(&e)),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn invalid_timeout_is_an_error() {
        assert!(matches!(
            parse_args(["whoiss", "--timeout", "-3"]),
            Err(WhoissError::Cli(_))
        ));
    }

    #[test]
    fn help_is_reported_as_display_help() {
        match parse_args(["whoiss", "--help"]) {
            Err(WhoissError::Cli(e)) => assert!(is_informational(&e)),
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn version_is_informational() {
        match parse_args(["whoiss", "--version"]) {
            Err(WhoissError::Cli(e)) => assert_eq!(e.kind(), ErrorKind::DisplayVersion),
            other => panic!("unexpected result {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn sites_and_options_are_read() {
        let matches =
            parse_args(["whoiss", "-c", "10", "-t", "2", "example.com", "http://example.org/"])
                .unwrap();
        assert_eq!(matches.get_one::<usize>("concurrency"), Some(&10));
        assert_eq!(matches.get_one::<u64>("timeout"), Some(&2));
        let sites: Vec<&String> = matches.get_many::<String>("sites").unwrap().collect();
        assert_eq!(sites, ["example.com", "http://example.org/"]);
    }

    #[test]
    fn no_sites_is_fine() {
        let matches = parse_args(["whoiss"]).unwrap();
        assert!(matches.get_many::<String>("sites").is_none());
    }
}
