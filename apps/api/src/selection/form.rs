use super::{InputSelection, Subject};

/// Both subjects' selections for one browser session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TailorForm {
    pub resume: InputSelection,
    pub job: InputSelection,
}

impl TailorForm {
    pub fn selection(&self, subject: Subject) -> &InputSelection {
        match subject {
            Subject::Resume => &self.resume,
            Subject::Job => &self.job,
        }
    }

    pub fn selection_mut(&mut self, subject: Subject) -> &mut InputSelection {
        match subject {
            Subject::Resume => &mut self.resume,
            Subject::Job => &mut self.job,
        }
    }

    /// Returns the active selection for (resume, job). Nothing is validated:
    /// empty strings and missing files pass through unchanged.
    pub fn resolve_active_inputs(&self) -> (&InputSelection, &InputSelection) {
        (&self.resume, &self.job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::Variant;

    #[test]
    fn test_subjects_are_independent() {
        let mut form = TailorForm::default();
        form.selection_mut(Subject::Resume).set_text("resume body");
        form.selection_mut(Subject::Job).set_url("https://jobs.example.com/42");

        form.selection_mut(Subject::Job).select(Variant::Paste);

        let (resume, job) = form.resolve_active_inputs();
        assert_eq!(resume.text(), Some("resume body"));
        assert_eq!(job, &InputSelection::Paste(String::new()));
    }

    #[test]
    fn test_resolve_passes_empty_values_through() {
        let mut form = TailorForm::default();
        form.selection_mut(Subject::Resume).select(Variant::Url);

        let (resume, job) = form.resolve_active_inputs();
        assert_eq!(resume.url(), Some(""));
        assert_eq!(job.variant(), Variant::Upload);
        assert!(job.file().is_none());
    }
}
