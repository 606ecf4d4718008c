mod aggregate_tests;
mod command_tests;
mod support;
