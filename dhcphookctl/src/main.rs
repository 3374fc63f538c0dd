use clap::Parser;
use dhcphook::facts::{
    INTERFACE, NEW_INTERFACE_MTU, NEW_IP_ADDRESS, NEW_SUBNET_MASK, OLD_IP_ADDRESS,
    OLD_SUBNET_MASK, REASON,
};
use dhcphook::{dispatch, FactSet, LinkControl, Outcome};
use log::{error, info};
use std::process::ExitCode;

/// DHCP client hook: applies a lease event to the kernel's interface and address tables.
///
/// Facts are normally passed by the DHCP client as environment variables; each one can
/// be overridden with the matching flag.
#[derive(Debug, Parser)]
#[clap(version, about)]
struct Cli {
    #[clap(long, env = INTERFACE)]
    interface: String,
    #[clap(long, env = REASON)]
    reason: String,
    #[clap(long, env = OLD_IP_ADDRESS)]
    old_ip_address: Option<String>,
    #[clap(long, env = NEW_IP_ADDRESS)]
    new_ip_address: Option<String>,
    #[clap(long, env = OLD_SUBNET_MASK)]
    old_subnet_mask: Option<String>,
    #[clap(long, env = NEW_SUBNET_MASK)]
    new_subnet_mask: Option<String>,
    #[clap(long, env = NEW_INTERFACE_MTU)]
    new_interface_mtu: Option<String>,

    /// Log the changes instead of applying them
    #[clap(long)]
    dry_run: bool,
    /// Log filter, used when RUST_LOG is unset
    #[clap(long, default_value = "debug")]
    log_level: String,
}

impl Cli {
    fn facts(&self) -> Result<FactSet, dhcphook::Error> {
        let optional = [
            (OLD_IP_ADDRESS, &self.old_ip_address),
            (NEW_IP_ADDRESS, &self.new_ip_address),
            (OLD_SUBNET_MASK, &self.old_subnet_mask),
            (NEW_SUBNET_MASK, &self.new_subnet_mask),
            (NEW_INTERFACE_MTU, &self.new_interface_mtu),
        ];

        FactSet::new(
            [
                (INTERFACE, self.interface.clone()),
                (REASON, self.reason.clone()),
            ]
            .into_iter()
            .chain(
                optional
                    .into_iter()
                    .filter_map(|(key, value)| value.clone().map(|value| (key, value))),
            ),
        )
    }
}

fn run<K: LinkControl>(facts: &FactSet, kernel: K) -> ExitCode {
    match dispatch(facts, &kernel) {
        Ok(Outcome::Applied) => {
            info!(
                "finished interface={} reason={}",
                facts.interface(),
                facts.reason()
            );
            ExitCode::SUCCESS
        }
        Ok(Outcome::Unhandled(_)) => ExitCode::SUCCESS,
        Err(e) => {
            error!(
                "aborting interface={} reason={} error=\"{}\"",
                facts.interface(),
                facts.reason(),
                e
            );
            ExitCode::FAILURE
        }
    }
}

fn main() -> ExitCode {
    let args = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(args.log_level.as_str()),
    )
    .init();

    let facts = match args.facts() {
        Ok(facts) => facts,
        Err(e) => {
            error!("invalid facts error=\"{e}\"");
            return ExitCode::FAILURE;
        }
    };

    apply(&facts, args.dry_run)
}

cfg_if::cfg_if! {
    if #[cfg(target_os = "linux")] {
        fn apply(facts: &FactSet, dry_run: bool) -> ExitCode {
            let kernel = match dhcphook::sys::Netlink::new() {
                Ok(kernel) => kernel,
                Err(e) => {
                    error!("netlink socket failed error=\"{e}\"");
                    return ExitCode::FAILURE;
                }
            };
            if dry_run {
                run(facts, dhcphook::DryRun(kernel))
            } else {
                run(facts, kernel)
            }
        }
    } else {
        fn apply(facts: &FactSet, _dry_run: bool) -> ExitCode {
            error!("no kernel backend for this platform interface={}", facts.interface());
            ExitCode::FAILURE
        }
    }
}
