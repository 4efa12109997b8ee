use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// The string form is both the database representation and the wire
/// (serde) representation — status vocabularies are part of the
/// application's fixed vocabulary and must survive round-trips intact.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(UserRole {
    Admin => "admin",
    Doctor => "doctor",
});

// Appointment statuses keep the clinic's Portuguese vocabulary.
// Any status is reachable from any other — there is no appointment
// state machine, only a field overwrite.
str_enum!(AppointmentStatus {
    Scheduled => "Agendada",
    Attended => "Atendida",
    Postponed => "Adiada",
    Cancelled => "Cancelada",
});

// Report statuses are governed by the lifecycle module: only
// Draft → Pending → Approved/Rejected, then signing from Approved.
str_enum!(ReportStatus {
    Draft => "Rascunho",
    Pending => "Pendente",
    Approved => "Aprovado",
    Rejected => "Rejeitado",
});
