mod instance;
pub use instance::*;
mod run;
pub use run::*;
