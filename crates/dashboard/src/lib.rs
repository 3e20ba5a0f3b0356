//! # Dashboard
//!
//! Blocking client for the parts of the Meraki Dashboard API that a firewall
//! rollout touches: organization and network inventory, and the appliance
//! inbound and Layer-3 firewall rule sets.
//!
//! ```no_run
//! use dashboard::backend::Backend;
//! use dashboard::backend::meraki::MerakiBackend;
//! use dashboard::Direction;
//!
//! let backend = MerakiBackend::new("my-api-key");
//! for org in backend.organizations()? {
//!     println!("{} ({})", org.name, org.id);
//! }
//! let current = backend.firewall_rules("L_123", Direction::Outbound)?;
//! println!("{current:#}");
//! # Ok::<(), dashboard::Error>(())
//! ```

pub mod backend;
pub mod error;
pub mod types;

pub use backend::Backend;
pub use error::{Error, ErrorCategory, Result};
pub use types::{Direction, Network, Organization, ParseDirectionError};
