pub use handle::Netlink;

mod handle;
mod socket;
