use serde::{Deserialize, Serialize};

/// The four screens of the registration wizard, in order
///
/// # Transitions
/// ```text
/// TeamInfo <-> ProblemTrack <-> Members <-> Review
/// ```
/// Moving forward is gated by the current step's validation; moving back
/// never is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum WizardStep {
    /// Team name and leader contact details
    TeamInfo,
    /// Choice of problem track
    ProblemTrack,
    /// Additional team members
    Members,
    /// Read-only summary before submitting
    Review,
}

impl WizardStep {
    pub const ALL: [WizardStep; 4] = [
        WizardStep::TeamInfo,
        WizardStep::ProblemTrack,
        WizardStep::Members,
        WizardStep::Review,
    ];

    /// Zero-based position of the step
    pub fn index(&self) -> usize {
        match self {
            WizardStep::TeamInfo => 0,
            WizardStep::ProblemTrack => 1,
            WizardStep::Members => 2,
            WizardStep::Review => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// The following step, staying on Review once there
    ///
    /// # Example
    /// ```
    /// use teamreg::domain::wizard::WizardStep;
    ///
    /// assert_eq!(WizardStep::TeamInfo.next(), WizardStep::ProblemTrack);
    /// assert_eq!(WizardStep::Review.next(), WizardStep::Review);
    /// ```
    pub fn next(&self) -> Self {
        Self::from_index(self.index() + 1).unwrap_or(*self)
    }

    /// The preceding step, staying on TeamInfo once there
    pub fn previous(&self) -> Self {
        self.index()
            .checked_sub(1)
            .and_then(Self::from_index)
            .unwrap_or(*self)
    }

    pub fn is_last(&self) -> bool {
        *self == WizardStep::Review
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::TeamInfo => "Team Info",
            WizardStep::ProblemTrack => "Problem Statement",
            WizardStep::Members => "Team Members",
            WizardStep::Review => "Review",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            WizardStep::TeamInfo => "Basic team information",
            WizardStep::ProblemTrack => "Choose your challenge",
            WizardStep::Members => "Add your team members",
            WizardStep::Review => "Confirm your registration",
        }
    }
}

impl std::fmt::Display for WizardStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title())
    }
}
