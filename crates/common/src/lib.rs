//! Shared helpers used by every binary and library crate in the workspace.

pub mod types;
pub mod env;

pub mod utils {
    pub mod logging;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }
}

