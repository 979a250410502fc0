//! Enumerated vocabulary of the permission model
//!
//! Every enum here is closed and declared at compile time. Wire spellings
//! (serde, `Display`, `FromStr`) are exact: parsing does no case folding or
//! trimming, so a forged or corrupted value never maps onto a real key.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Error returned when a string does not name a declared variant
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind}: '{value}'")]
pub struct ParseKeyError {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! keyed_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal, serde = $case:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $key:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = $case)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All variants in declaration order
            pub const ALL: &'static [$name] = &[ $( $name::$variant ),+ ];

            /// Wire spelling of this variant
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $key ),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.pad(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseKeyError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $key => Ok($name::$variant), )+
                    _ => Err(ParseKeyError { kind: $kind, value: s.to_string() }),
                }
            }
        }
    };
}

keyed_enum! {
    /// Identity category assigned to a user. Exactly one per user.
    Role, "role", serde = "snake_case" {
        /// Full access to every module and navigation section
        SuperAdmin => "super_admin",
        Doctor => "doctor",
        Technician => "technician",
    }
}

keyed_enum! {
    /// Business capability area; actions are granted per module
    Module, "module", serde = "snake_case" {
        Patients => "patients",
        Users => "users",
        Analytics => "analytics",
        Reports => "reports",
        Settings => "settings",
        Notifications => "notifications",
    }
}

keyed_enum! {
    /// Fine-grained operation inside a module
    ModuleAction, "action", serde = "snake_case" {
        View => "view",
        Add => "add",
        Edit => "edit",
        Delete => "delete",
        Export => "export",
        Import => "import",
        Print => "print",
        UploadFiles => "upload_files",
    }
}

keyed_enum! {
    /// Navigation section visibility gate, independent of module actions
    SidebarMenu, "sidebar menu", serde = "kebab-case" {
        Dashboard => "dashboard",
        Patients => "patients",
        AddPatient => "add-patient",
        Files => "files",
        DicomViewer => "dicom-viewer",
        Analytics => "analytics",
        Notifications => "notifications",
        UserManagement => "user-management",
        SessionMonitoring => "session-monitoring",
        Settings => "settings",
    }
}
