use crate::domain::model::ProbeOutcome;

/// Append-only, arrival-ordered store of probe outcomes.
#[derive(Debug, Default, Clone)]
pub struct ResultCollector {
    outcomes: Vec<ProbeOutcome>,
}

impl ResultCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, outcome: ProbeOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ProbeOutcome> {
        self.outcomes.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbeOutcome> {
        self.outcomes.iter()
    }

    pub fn as_slice(&self) -> &[ProbeOutcome] {
        &self.outcomes
    }

    pub fn into_vec(self) -> Vec<ProbeOutcome> {
        self.outcomes
    }
}

impl<'a> IntoIterator for &'a ResultCollector {
    type Item = &'a ProbeOutcome;
    type IntoIter = std::slice::Iter<'a, ProbeOutcome>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
