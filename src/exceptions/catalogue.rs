//! Exception registry.
//!
//! # Responsibilities
//! - Declare every known exception and its public contract
//! - Validate the catalogue once at startup
//! - Answer lookups by identifier or by variant
//!
//! # Adding an exception
//! Add one entry to the `catalogue!` invocation below. The `Exception`
//! variant, its identifier, and its registry entry are all generated from it;
//! the responder needs no change.

use axum::http::StatusCode;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Raw catalogue entry, validated into an [`ExceptionDescriptor`].
#[derive(Debug, Clone, Copy)]
pub struct CatalogueEntry {
    pub exception: Exception,
    pub id: &'static str,
    pub message: &'static str,
    pub status: u16,
    pub should_log: bool,
}

macro_rules! catalogue {
    ($(
        $(#[$meta:meta])*
        $variant:ident {
            id: $id:literal,
            message: $message:literal,
            status: $status:literal,
            should_log: $should_log:literal $(,)?
        }
    ),+ $(,)?) => {
        /// Known exception kinds.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum Exception {
            $( $(#[$meta])* $variant, )+
        }

        impl Exception {
            /// Every declared variant.
            pub const ALL: &'static [Exception] = &[ $( Exception::$variant, )+ ];

            /// Stable identifier of this exception.
            pub const fn id(self) -> &'static str {
                match self {
                    $( Exception::$variant => $id, )+
                }
            }
        }

        /// Built-in catalogue.
        pub const ENTRIES: &[CatalogueEntry] = &[
            $(
                CatalogueEntry {
                    exception: Exception::$variant,
                    id: $id,
                    message: $message,
                    status: $status,
                    should_log: $should_log,
                },
            )+
        ];
    };
}

catalogue! {
    /// Client tried to create a thing whose name is taken. User-induced, not logged.
    ThingWithNameAlreadyExists {
        id: "THING_WITH_NAME_ALREADY_EXISTS",
        message: "A thing with the same name already exists.",
        status: 400,
        should_log: false,
    },
    /// The notification service call failed. Dependency-induced, logged.
    NotificationServiceUnavailable {
        id: "NOTIFICATION_SERVICE_UNAVAILABLE",
        message: "The notification service is currently unavaible, please retry later.",
        status: 500,
        should_log: true,
    },
    /// Request body is not a thing payload.
    InvalidThingPayload {
        id: "INVALID_THING_PAYLOAD",
        message: "The request body must be a JSON object with a non-empty name.",
        status: 400,
        should_log: false,
    },
}

impl std::fmt::Display for Exception {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// Public contract of a known exception.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExceptionDescriptor {
    pub exception: Exception,
    pub id: &'static str,
    /// Shown verbatim to the client.
    pub message: &'static str,
    pub status: StatusCode,
    /// Whether occurrences are written to the failure sink.
    pub should_log: bool,
}

/// Reasons a catalogue is rejected.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate exception identifier {0}")]
    DuplicateId(&'static str),

    #[error("exception {0:?} is declared more than once")]
    DuplicateVariant(Exception),

    #[error("exception {0:?} has no catalogue entry")]
    MissingVariant(Exception),

    #[error("exception {id} has invalid HTTP status {status}")]
    InvalidStatus { id: &'static str, status: u16 },

    #[error("exception {0} has an empty message")]
    EmptyMessage(&'static str),
}

/// Immutable catalogue of known exceptions.
#[derive(Debug)]
pub struct Registry {
    by_id: HashMap<&'static str, ExceptionDescriptor>,
}

impl Registry {
    /// Build the registry from the built-in catalogue.
    pub fn builtin() -> Result<Self, RegistryError> {
        Self::from_entries(ENTRIES)
    }

    /// Validate `entries` and build a registry from them.
    ///
    /// Every [`Exception`] variant must appear exactly once.
    pub fn from_entries(entries: &[CatalogueEntry]) -> Result<Self, RegistryError> {
        let mut by_id = HashMap::with_capacity(entries.len());
        let mut seen = HashSet::with_capacity(entries.len());

        for entry in entries {
            if !(100..=599).contains(&entry.status) {
                return Err(RegistryError::InvalidStatus {
                    id: entry.id,
                    status: entry.status,
                });
            }
            let status = StatusCode::from_u16(entry.status).map_err(|_| {
                RegistryError::InvalidStatus {
                    id: entry.id,
                    status: entry.status,
                }
            })?;
            if entry.message.trim().is_empty() {
                return Err(RegistryError::EmptyMessage(entry.id));
            }
            if !seen.insert(entry.exception) {
                return Err(RegistryError::DuplicateVariant(entry.exception));
            }

            let descriptor = ExceptionDescriptor {
                exception: entry.exception,
                id: entry.id,
                message: entry.message,
                status,
                should_log: entry.should_log,
            };
            if by_id.insert(entry.id, descriptor).is_some() {
                return Err(RegistryError::DuplicateId(entry.id));
            }
        }

        if let Some(missing) = Exception::ALL.iter().find(|e| !seen.contains(*e)) {
            return Err(RegistryError::MissingVariant(*missing));
        }

        Ok(Self { by_id })
    }

    /// Look up a descriptor by its string identifier.
    pub fn lookup(&self, id: &str) -> Option<&ExceptionDescriptor> {
        self.by_id.get(id)
    }

    /// Look up the descriptor of a known exception.
    pub fn resolve(&self, exception: Exception) -> Option<&ExceptionDescriptor> {
        self.by_id
            .get(exception.id())
            .filter(|d| d.exception == exception)
    }

    pub fn descriptors(&self) -> impl Iterator<Item = &ExceptionDescriptor> {
        self.by_id.values()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
