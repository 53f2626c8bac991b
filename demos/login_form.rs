//! Login Form
//!
//! This example drives a login form's submit button from the contents of its
//! two text fields.
//!
//! Key concepts:
//! - Form states (Empty -> Middle -> Filled)
//! - AND/OR combinations over several properties
//! - Preferred-next hints to pick between overlapping conditions
//! - Entry actions writing back to the observed form
//!
//! Run with: RUST_LOG=statewatch=debug cargo run --example login_form

use statewatch::core::Clause;
use statewatch::machine::StateMachine;
use statewatch::subject::{Observable, Subject};
use statewatch::{property, state_enum, MachineConfig, MachineError};
use tracing_subscriber::EnvFilter;

state_enum! {
    enum FormState {
        Empty,
        Middle,
        Filled,
    }
}

#[derive(Debug, Default)]
struct LoginForm {
    login: String,
    password: String,
    submit_enabled: bool,
    hint: String,
}

impl Subject for LoginForm {
    const PROPERTIES: &'static [&'static str] = &["login", "password", "submit_enabled", "hint"];
}

fn blank(value: &String) -> bool {
    value.trim().is_empty()
}

fn present(value: &String) -> bool {
    !blank(value)
}

fn main() -> Result<(), MachineError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("statewatch=info")),
        )
        .init();

    println!("=== Login Form ===\n");

    let form = Observable::new(LoginForm::default());
    let login = property!(LoginForm, login: String);
    let password = property!(LoginForm, password: String);
    let submit_enabled = property!(LoginForm, submit_enabled: bool);
    let hint = property!(LoginForm, hint: String);

    let machine = StateMachine::with_config(&form, MachineConfig::new().history_capacity(16));

    machine
        .configure_state(FormState::Empty)?
        .set(&submit_enabled, false)?
        .set(&hint, "Enter your login and password".to_string())?
        .preferred_next(FormState::Middle)
        .build();
    machine
        .configure_state(FormState::Middle)?
        .set(&submit_enabled, false)?
        .set(&hint, "One more field to go".to_string())?
        .preferred_next(FormState::Filled)
        .build();
    machine
        .configure_state(FormState::Filled)?
        .set(&submit_enabled, true)?
        .set(&hint, "Ready to sign in".to_string())?
        .on_leave(|_| println!("  (submit disabled again)"))
        .build();

    machine.all(
        FormState::Empty,
        vec![Clause::new(&login, blank)?, Clause::new(&password, blank)?],
    )?;
    machine.combine_named(
        "or",
        FormState::Middle,
        vec![Clause::new(&login, blank)?, Clause::new(&password, blank)?],
    )?;
    machine.all(
        FormState::Filled,
        vec![Clause::new(&login, present)?, Clause::new(&password, present)?],
    )?;

    machine.initialize(FormState::Empty)?;
    report(&machine, &form);

    let edits = [
        ("login", "admin"),
        ("password", "hunter2"),
        ("login", ""),
        ("login", "root"),
    ];

    for (field, value) in edits {
        println!("\nSet {} = {:?}", field, value);
        let property = if field == "login" { &login } else { &password };
        form.set(property, value.to_string())?;
        report(&machine, &form);
    }

    let history = machine.history();
    println!("\nPath:");
    for state in history.get_path() {
        println!("  {:?}", state);
    }

    machine.dispose();
    println!("\nMachine disposed; further edits are ignored.");
    form.set(&login, String::new())?;
    report(&machine, &form);

    Ok(())
}

fn report(machine: &StateMachine<LoginForm, FormState>, form: &Observable<LoginForm>) {
    let (enabled, hint) = form.read(|f| (f.submit_enabled, f.hint.clone()));
    println!(
        "  state: {:?}, submit enabled: {}, hint: {}",
        machine.current_state(),
        enabled,
        hint
    );
}
