//! Shared test collaborators and end-to-end decision scenarios.

mod scenarios;
