//! Behavioural tests spanning discovery, link synthesis, and resolution.

mod behaviour;
