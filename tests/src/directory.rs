mod integration;
mod names;
