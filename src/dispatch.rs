use crate::reconcile::{flush, set_mtu, update_address};
use crate::{Error, FactSet, Family, Interface, LinkControl, Reason};
use log::{info, warn};

/// Result of a lease event that did not fail.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Outcome {
    /// The transition for the reason was applied.
    Applied,
    /// The reason is not one the hook acts on; nothing was touched.
    Unhandled(String),
}

/// Drives `interface` into the state implied by the lease event in `facts`.
///
/// The interface is resolved before any other kernel operation, and a v4
/// flush always runs before the address add of the same event. The first
/// failure aborts the event.
pub fn dispatch<K: LinkControl>(facts: &FactSet, kernel: &K) -> Result<Outcome, Error> {
    let reason = facts.reason();
    info!("starting interface={} reason={}", facts.interface(), reason);

    let interface = Interface::resolve(facts.interface(), kernel)?;

    match &reason {
        Reason::Preinit => {
            interface.set_up(kernel)?;
            flush(kernel, &interface, Family::All)?;
        }
        Reason::Bound | Reason::Renew | Reason::Rebind | Reason::Reboot => {
            let old = facts.old_ip_address();
            let new = facts.new_ip_address();
            // Plain string comparison; the lease manager emits normalized dotted quads.
            if !old.is_empty() && old != new {
                flush(kernel, &interface, Family::V4)?;
            }
            if old.is_empty()
                || old != new
                || matches!(reason, Reason::Bound | Reason::Reboot)
            {
                update_address(kernel, &interface, new, facts.new_subnet_mask())?;
            }
        }
        Reason::Expire | Reason::Fail | Reason::Release | Reason::Stop => {
            flush(kernel, &interface, Family::V4)?;
        }
        Reason::Timeout => {
            update_address(
                kernel,
                &interface,
                facts.new_ip_address(),
                facts.new_subnet_mask(),
            )?;
            set_mtu(kernel, &interface, facts.new_interface_mtu())?;
        }
        Reason::Other(other) => {
            warn!("reason unhandled interface={interface} reason={other:?}");
            return Ok(Outcome::Unhandled(other.clone()));
        }
    }

    Ok(Outcome::Applied)
}
