mod common;
mod console;
