//! The `iget_sim_time` sentinel convention (§4.5, §9 open question (b)).

/// Convert a `Store::get_sim_time` result into the public sentinel
/// contract: `-1.0` for a report step not yet loaded, the value
/// otherwise. Internally the store models this as `Option<f64>`; this
/// boundary function is the only place the `-1.0` sentinel appears,
/// matching the source's `enkf_state_iget_sim_time` /
/// `member_config_iget_sim_time` contract exactly so scenario-style
/// tests can assert the sentinel directly.
pub fn sim_time_or_sentinel(value: Option<f64>) -> f64 {
    value.unwrap_or(-1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loaded_value_passes_through() {
        assert_eq!(sim_time_or_sentinel(Some(42.5)), 42.5);
    }

    #[test]
    fn unloaded_step_returns_sentinel() {
        assert_eq!(sim_time_or_sentinel(None), -1.0);
    }
}
