mod ledger;
mod money;
mod period;
mod record;

pub use ledger::*;
pub use money::*;
pub use period::*;
pub use record::*;
