use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(Workflow {
    PriorAuth => "prior_auth",
    LabResults => "lab_results",
    PrescriptionStatus => "prescription_status",
    PatientQuestions => "patient_questions",
    Mainline => "mainline",
});

str_enum!(FieldType {
    Text => "text",
    Date => "date",
    Datetime => "datetime",
    Time => "time",
    Phone => "phone",
    Select => "select",
});

str_enum!(DisplayPriority {
    Mobile => "mobile",
    Tablet => "tablet",
    Desktop => "desktop",
});

str_enum!(SessionStatus {
    Starting => "starting",
    Running => "running",
    Completed => "completed",
    Failed => "failed",
    Transferred => "transferred",
});

str_enum!(MessageRole {
    Assistant => "assistant",
    User => "user",
    System => "system",
});

str_enum!(MessageKind {
    Transcript => "transcript",
    Ivr => "ivr",
    IvrAction => "ivr_action",
    IvrSummary => "ivr_summary",
    Transfer => "transfer",
});

impl Default for DisplayPriority {
    fn default() -> Self {
        Self::Desktop
    }
}

impl DisplayPriority {
    /// Rank used for breakpoint thresholds: mobile columns survive every
    /// viewport, desktop-only columns survive only the widest.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Mobile => 0,
            Self::Tablet => 1,
            Self::Desktop => 2,
        }
    }
}

impl SessionStatus {
    /// Whether this session still has a live call attached.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Starting | Self::Running)
    }
}
