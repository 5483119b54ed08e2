//! Population of the built-in substitution keys consulted by simulator
//! input templates (§3, §6).

use ensrun_core::{Iens, RandomSource, SubstError, SubstTable};

use crate::run_descriptor::RunDescriptor;

/// Populate every built-in key documented in §6 for the current step,
/// given the already-expanded `eclbase_fmt`. `RUNPATH`, `IENS`, and
/// `IENS4` are expected to already be present (`RunDescriptor::set`
/// inserts them while resolving `run_path`).
#[allow(clippy::too_many_arguments)]
pub fn populate(
    subst: &mut SubstTable,
    descriptor: &RunDescriptor,
    eclbase_fmt: &str,
    iens: Iens,
    attempt: u32,
    case_name: &str,
    equil_init_file: &str,
    random: &dyn RandomSource,
) -> Result<(), SubstError> {
    let eclbase = subst.expand(eclbase_fmt)?;
    subst.insert("ECLBASE", eclbase.clone(), "simulator case base name");
    subst.insert("ECL_BASE", eclbase.clone(), "simulator case base name (legacy alias)");
    subst.insert("SMSPEC", format!("{eclbase}.SMSPEC"), "summary specification file");

    let step1 = descriptor.step1();
    let step2 = descriptor.step2();
    subst.insert("TSTEP1", step1.get().to_string(), "integration start step");
    subst.insert("TSTEP2", step2.get().to_string(), "integration end step");
    subst.insert("TSTEP1_04", step1.padded4(), "zero-padded integration start step");
    subst.insert("TSTEP2_04", step2.padded4(), "zero-padded integration end step");
    subst.insert(
        "RESTART_FILE1",
        format!("{eclbase}.F{:04}", step1.get()),
        "restart file name at step1",
    );
    subst.insert(
        "RESTART_FILE2",
        format!("{eclbase}.F{:04}", step2.get()),
        "restart file name at step2",
    );

    subst.insert(
        "RANDINT",
        random.next_randint(iens, attempt).to_string(),
        "fresh pseudo-random integer draw",
    );
    subst.insert(
        "RANDFLOAT",
        random.next_randfloat(iens, attempt).to_string(),
        "fresh pseudo-random float draw",
    );

    subst.insert("CASE", case_name, "ensemble case name");

    let init = if step1.get() == 0 {
        format!("INCLUDE '{equil_init_file}' /")
    } else {
        format!("RESTART '{eclbase}' {} /", step1.get())
    };
    subst.insert("INIT", init, "initial-condition include/restart directive");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ensrun_core::{ReportStep, RunMode, StateClass};
    use ensrun_test_utils::ScriptedRandomSource;

    fn descriptor_at(step1: u32, step2: u32) -> RunDescriptor {
        let mut descriptor = RunDescriptor::new();
        let mut subst = SubstTable::new();
        descriptor
            .set(
                RunMode::Assimilation,
                true,
                2,
                ReportStep::new(0),
                StateClass::Analyzed,
                StateClass::Analyzed,
                ReportStep::new(0),
                ReportStep::new(step1),
                ReportStep::new(step2),
                Iens::new(3),
                "/ens/real<IENS>",
                &mut subst,
            )
            .unwrap();
        descriptor
    }

    #[test]
    fn init_uses_include_at_step1_zero() {
        let descriptor = descriptor_at(0, 2);
        let mut subst = SubstTable::new();
        let random = ScriptedRandomSource::new();
        populate(&mut subst, &descriptor, "BASE_<IENS>", Iens::new(3), 0, "CASE1", "equil.inc", &random)
            .unwrap();
        assert_eq!(subst.get("INIT"), Some("INCLUDE 'equil.inc' /"));
    }

    #[test]
    fn init_uses_restart_past_step1_zero() {
        let descriptor = descriptor_at(5, 10);
        let mut subst = SubstTable::new();
        let random = ScriptedRandomSource::new();
        populate(&mut subst, &descriptor, "BASE_<IENS>", Iens::new(3), 0, "CASE1", "equil.inc", &random)
            .unwrap();
        assert_eq!(subst.get("INIT"), Some("RESTART 'BASE_3' 5 /"));
    }

    #[test]
    fn randint_and_randfloat_are_scoped_to_iens_and_attempt() {
        let descriptor = descriptor_at(0, 1);
        let random = ScriptedRandomSource::new();
        random.set_randint(Iens::new(3), 1, 42);
        let mut subst = SubstTable::new();
        populate(&mut subst, &descriptor, "BASE_<IENS>", Iens::new(3), 1, "CASE1", "equil.inc", &random)
            .unwrap();
        assert_eq!(subst.get("RANDINT"), Some("42"));
    }
}
