pub mod conditions;
pub mod ivars;
pub mod layout;
pub mod phase;
pub mod scene;
pub mod trial;

pub use conditions::{flanker_letter, Congruency, HandPlacement, TargetLetter};
pub use ivars::{IndependentVariableSet, TrialFactors};
pub use layout::Layout;
pub use phase::SessionPhase;
pub use scene::{DrawCmd, Layer};
pub use trial::{Outcome, ResponseMade, TrialRecord, TrialState};
