//! Backend module catalogue

use serde::{Deserialize, Serialize};

use crate::constants::{ENDPOINT_SUFFIX, PORT_SUFFIX};
use crate::impl_wire_name_conversions;

/// A backend subsystem with its own base URL and port convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Module {
    /// Identity and access management
    Iam,
    Resources,
    Assets,
    Oauth,
    Notifications,
    /// Commerce
    Ec,
    /// Events
    Evci,
    /// Lending
    Borrow,
    /// Server-side compositions
    Composr,
    Scheduler,
    /// File storage
    Webfs,
}

impl_wire_name_conversions!(Module {
    Iam => "iam",
    Resources => "resources",
    Assets => "assets",
    Oauth => "oauth",
    Notifications => "notifications",
    Ec => "ec",
    Evci => "evci",
    Borrow => "borrow",
    Composr => "composr",
    Scheduler => "scheduler",
    Webfs => "webfs",
});

impl Module {
    pub const ALL: [Self; 11] = [
        Self::Iam,
        Self::Resources,
        Self::Assets,
        Self::Oauth,
        Self::Notifications,
        Self::Ec,
        Self::Evci,
        Self::Borrow,
        Self::Composr,
        Self::Scheduler,
        Self::Webfs,
    ];

    /// Port substituted for `{{modulePort}}` when config has no override.
    #[must_use]
    pub const fn default_port(&self) -> u16 {
        match self {
            Self::Iam => 8082,
            Self::Resources => 8080,
            Self::Assets => 8092,
            Self::Oauth => 8084,
            Self::Notifications => 8094,
            Self::Ec => 8088,
            Self::Evci => 8086,
            Self::Borrow => 8100,
            Self::Composr => 3000,
            Self::Scheduler => 8098,
            Self::Webfs => 8096,
        }
    }

    /// Config key holding a full endpoint override, e.g. `iamEndpoint`.
    #[must_use]
    pub fn endpoint_key(&self) -> String {
        format!("{}{ENDPOINT_SUFFIX}", self.as_str())
    }

    /// Config key holding a port override, e.g. `iamPort`.
    #[must_use]
    pub fn port_key(&self) -> String {
        format!("{}{PORT_SUFFIX}", self.as_str())
    }
}
