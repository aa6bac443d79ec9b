// ABOUTME: HTTP API handler modules for the sensord server.
// ABOUTME: Reading CRUD is the whole surface.

pub mod readings;
