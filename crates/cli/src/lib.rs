pub mod cli;
pub mod logging;
pub mod reporters;
pub mod url;
