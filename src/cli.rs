/// interactive terminal browser of the guide
pub mod cli_main;
