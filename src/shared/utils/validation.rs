use crate::modules::study::Study;
use crate::shared::errors::AppError;

pub struct Validator;

impl Validator {
    /// Checks a collection before it may replace the store's canonical set
    pub fn validate_studies(studies: &[Study]) -> Result<(), AppError> {
        if let Some((index, study)) = studies
            .iter()
            .enumerate()
            .find(|(_, study)| !study.has_valid_categories())
        {
            return Err(AppError::ValidationError(format!(
                "Study #{} ('{}') has no categories",
                index, study.id
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_normalized_studies() {
        let studies = vec![Study::new("1", "a"), Study::new("2", "b")];
        assert!(Validator::validate_studies(&studies).is_ok());
        assert!(Validator::validate_studies(&[]).is_ok());
    }

    #[test]
    fn test_rejects_study_without_categories() {
        let studies = vec![
            Study::new("1", "a"),
            Study::new("2", "b").with_categories(Vec::<String>::new()),
        ];
        let err = Validator::validate_studies(&studies).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(msg) if msg.contains("#1")));
    }
}
