//! Chrome session management and the picker bridge over CDP

pub mod config;
pub mod page;
pub mod restriction;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use page::CdpPage;
pub use restriction::{injection_failure_reason, normalize_url, restriction_reason};
pub use session::BrowserSession;
