//! Roster tests: creation rolls, status mutation, skill progression.

use opscenter_core::{
    engine::SimEngine,
    rng::{RngBank, SubsystemSlot},
    roster::{OperatorStatus, Roster, SkillType, Specialty, DEFAULT_OPERATOR_NAMES},
};

fn roster(seed: u64) -> Roster {
    let bank = RngBank::new(seed);
    let mut rng = bank.for_subsystem_at_tick(SubsystemSlot::Roster, 0);
    Roster::create(&DEFAULT_OPERATOR_NAMES, &mut rng)
}

#[test]
fn specialties_follow_cyclic_pattern() {
    let roster = roster(1);
    let specialties: Vec<Specialty> = roster.operators().iter().map(|op| op.specialty).collect();
    assert_eq!(
        specialties,
        vec![
            Specialty::Fire,
            Specialty::Medical,
            Specialty::Security,
            Specialty::Technical,
            Specialty::Fire,
            Specialty::Medical,
            Specialty::Security,
            Specialty::General,
        ]
    );
}

#[test]
fn initial_rolls_stay_in_their_bands() {
    for seed in 0..50 {
        for op in roster(seed).operators() {
            assert!((50..=90).contains(&op.experience), "{}: experience {}", op.id, op.experience);
            assert_eq!(op.status, OperatorStatus::Idle);
            for skill in SkillType::ALL {
                let value = op.skills.get(skill);
                if op.specialty.matches(skill) {
                    assert!((60..=80).contains(&value), "{}: specialty {skill:?} = {value}", op.id);
                } else {
                    assert!((30..=50).contains(&value), "{}: base {skill:?} = {value}", op.id);
                }
            }
        }
    }
}

#[test]
fn ids_names_and_workstations_are_positional() {
    let roster = roster(3);
    assert_eq!(roster.len(), 8);
    for (index, op) in roster.operators().iter().enumerate() {
        assert_eq!(op.id, format!("operator-{}", index + 1));
        assert_eq!(op.name, DEFAULT_OPERATOR_NAMES[index]);
        assert_eq!(op.assigned_workstation, Some((index + 1).to_string()));
    }
}

#[test]
fn improve_skill_clamps_at_one_hundred() {
    let mut roster = roster(5);
    for _ in 0..200 {
        roster.improve_skill("operator-1", SkillType::Fire, 2);
    }
    roster.improve_skill("operator-1", SkillType::Medical, u8::MAX);

    let op = roster.find_by_id("operator-1").unwrap();
    assert_eq!(op.skills.fire, 100);
    assert_eq!(op.skills.medical, 100);
    assert_eq!(op.experience, 100);
    for skill in SkillType::ALL {
        assert!(op.skills.get(skill) <= 100);
    }
}

#[test]
fn improve_skill_adds_amount_and_one_experience() {
    let mut roster = roster(8);
    let before = roster.find_by_id("operator-2").unwrap().clone();
    let new_value = roster.improve_skill("operator-2", SkillType::Security, 2);

    let after = roster.find_by_id("operator-2").unwrap();
    assert_eq!(new_value, Some(before.skills.security + 2));
    assert_eq!(after.experience, before.experience + 1);
    assert_eq!(after.skills.fire, before.skills.fire);
}

#[test]
fn missing_operator_is_a_silent_no_op() {
    let mut roster = roster(9);
    assert!(!roster.set_status("operator-99", OperatorStatus::Busy));
    assert_eq!(roster.improve_skill("operator-99", SkillType::Fire, 2), None);
    assert!(!roster.assign_workstation("operator-99", "3"));
    assert_eq!(roster.list_idle().len(), 8);
}

#[test]
fn status_queries_partition_the_roster() {
    let mut roster = roster(11);
    roster.set_status("operator-1", OperatorStatus::Responding);
    roster.set_status("operator-4", OperatorStatus::Busy);

    let idle: Vec<&str> = roster.list_idle().iter().map(|op| op.id.as_str()).collect();
    let engaged: Vec<&str> = roster
        .list_busy_or_responding()
        .iter()
        .map(|op| op.id.as_str())
        .collect();

    assert_eq!(idle.len(), 6);
    assert_eq!(engaged, vec!["operator-1", "operator-4"]);
}

#[test]
fn workstation_can_be_reassigned_through_engine() {
    let mut engine = SimEngine::build_test("roster-ws".into(), 4).unwrap();
    engine
        .apply_command(opscenter_core::command::PlayerCommand::AssignWorkstation {
            operator_id: "operator-3".into(),
            workstation_id: "7".into(),
        })
        .unwrap();
    let op = engine.store.roster.find_by_id("operator-3").unwrap();
    assert_eq!(op.assigned_workstation.as_deref(), Some("7"));
    assert_eq!(engine.ignored_commands(), 0);
}

#[test]
fn workstation_outside_the_floor_plan_is_ignored() {
    let mut engine = SimEngine::build_test("roster-ws-bad".into(), 4).unwrap();
    let events = engine
        .apply_command(opscenter_core::command::PlayerCommand::AssignWorkstation {
            operator_id: "operator-3".into(),
            workstation_id: "9".into(),
        })
        .unwrap();

    assert!(events.iter().any(|e| matches!(
        e,
        opscenter_core::event::SimEvent::CommandIgnored { reason, .. } if reason == "workstation_not_found"
    )));
    let op = engine.store.roster.find_by_id("operator-3").unwrap();
    assert_eq!(op.assigned_workstation.as_deref(), Some("3"));
    assert_eq!(engine.ignored_commands(), 1);

    let mut roster = roster(4);
    assert!(!roster.assign_workstation("operator-1", "0"));
    assert_eq!(roster.find_by_id("operator-1").unwrap().assigned_workstation.as_deref(), Some("1"));
}
