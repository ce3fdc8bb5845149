use crate::error::SessionError;

/// The learner's selections, one slot per question position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnswerStore {
    slots: Vec<Option<String>>,
    sealed: bool,
}

impl AnswerStore {
    pub fn new(num_questions: usize) -> Self {
        Self {
            slots: vec![None; num_questions],
            sealed: false,
        }
    }

    /// Record `option` at `index`, replacing any earlier choice.
    ///
    /// Options are not checked against the question; an unknown option simply
    /// never matches during scoring.
    pub fn set(&mut self, index: usize, option: impl Into<String>) -> Result<(), SessionError> {
        if self.sealed {
            return Err(SessionError::AnswersSealed);
        }

        let total = self.slots.len();
        let slot = self
            .slots
            .get_mut(index)
            .ok_or(SessionError::NoSuchQuestion { index, total })?;
        *slot = Some(option.into());
        Ok(())
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.slots.get(index).and_then(|slot| slot.as_deref())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn answered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn as_slice(&self) -> &[Option<String>] {
        &self.slots
    }

    /// Freeze the answers once they are handed to scoring.
    pub(crate) fn seal(&mut self) {
        self.sealed = true;
    }

    pub fn is_sealed(&self) -> bool {
        self.sealed
    }
}
