use serde::Serialize;

/// What a catalog bootstrap did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum BootstrapOutcome {
    /// The loaded collection was installed
    Applied { count: usize },
    /// A newer collection was installed while loading; the result was dropped
    Superseded,
    /// Every attempt failed; the store carries the error
    Failed,
}

impl BootstrapOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, BootstrapOutcome::Applied { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(BootstrapOutcome::Applied { count: 4 }).unwrap();
        assert_eq!(json["outcome"], "applied");
        assert_eq!(json["count"], 4);
        assert_eq!(
            serde_json::to_value(BootstrapOutcome::Superseded).unwrap()["outcome"],
            "superseded"
        );
    }
}
