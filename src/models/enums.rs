use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern.
///
/// Extra `| "alias"` literals are accepted on input (both `FromStr` and serde)
/// but never produced on output.
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal $(| $alias:literal)*),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $s)]
                $(#[serde(alias = $alias)])*
                $variant
            ),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }

            /// Every variant, in declaration order.
            pub fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s $(| $alias)* => Ok(Self::$variant)),+,
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

// `approved` was used interchangeably with `ready_for_export` by older clients.
str_enum!(DocumentStatus {
    Pending => "pending",
    Reviewing => "reviewing",
    ReadyForExport => "ready_for_export" | "approved",
    Rejected => "rejected",
    Exported => "exported",
});

str_enum!(FieldState {
    Pending => "pending",
    Approved => "approved",
    Rejected => "rejected",
});

str_enum!(ExportFormat {
    Json => "json",
    Csv => "csv",
    Excel => "excel",
    Xml => "xml",
});

str_enum!(ExportStatus {
    Completed => "completed",
    Failed => "failed",
});

str_enum!(MessageRole {
    User => "user",
    Assistant => "assistant",
});

str_enum!(View {
    Dashboard => "dashboard",
    Upload => "upload",
    Review => "review",
    Export => "export",
    History => "history",
    Templates => "templates",
});

impl DocumentStatus {
    /// Human-readable label ("ready for export").
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }
}

impl Default for FieldState {
    fn default() -> Self {
        Self::Pending
    }
}

impl Default for View {
    fn default() -> Self {
        Self::Dashboard
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn document_status_round_trip() {
        for (variant, s) in [
            (DocumentStatus::Pending, "pending"),
            (DocumentStatus::Reviewing, "reviewing"),
            (DocumentStatus::ReadyForExport, "ready_for_export"),
            (DocumentStatus::Rejected, "rejected"),
            (DocumentStatus::Exported, "exported"),
        ] {
            assert_eq!(variant.as_str(), s);
            assert_eq!(DocumentStatus::from_str(s).unwrap(), variant);
        }
    }

    #[test]
    fn approved_alias_maps_to_ready_for_export() {
        assert_eq!(
            DocumentStatus::from_str("approved").unwrap(),
            DocumentStatus::ReadyForExport
        );
        let parsed: DocumentStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(parsed, DocumentStatus::ReadyForExport);
        // Output always uses the canonical name
        assert_eq!(
            serde_json::to_string(&parsed).unwrap(),
            "\"ready_for_export\""
        );
    }

    #[test]
    fn status_label_replaces_underscores() {
        assert_eq!(DocumentStatus::ReadyForExport.label(), "ready for export");
        assert_eq!(DocumentStatus::Pending.label(), "pending");
    }

    #[test]
    fn view_round_trip_and_default() {
        for view in View::all() {
            assert_eq!(View::from_str(view.as_str()).unwrap(), *view);
        }
        assert_eq!(View::default(), View::Dashboard);
    }

    #[test]
    fn export_format_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&ExportFormat::Excel).unwrap(), "\"excel\"");
        assert_eq!(ExportFormat::all().len(), 4);
    }

    #[test]
    fn invalid_enum_returns_error() {
        assert!(DocumentStatus::from_str("archived").is_err());
        assert!(View::from_str("settings").is_err());
        assert!(ExportFormat::from_str("").is_err());
    }
}
