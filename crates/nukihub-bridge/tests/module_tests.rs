//! Integration tests for the lock module: the poll cycle driven through the
//! MQTT module runtime.

mod common;

use common::{FakeLock, MemoryPrefs, Recorder, keypad_entry, locked_state, log_entry};
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_time::{Duration, Instant};
use nukihub_bridge::{
    BridgeConfig, BridgeError, LockModule, QueryKind, SharedLockModule, TopicResolver,
    config::keys,
};
use nukihub_lock::{BatteryReport, Config, KeyTurnerState, LockState, LoggingType};
use nukihub_mqtt::{ModuleRuntime, Publish};

type Module = LockModule<FakeLock, 2048>;

fn module(lock: FakeLock, keypad: bool) -> Module {
    let config = BridgeConfig::new()
        .with_keypad_control(keypad)
        .with_max_keypad_code_count(1)
        .with_tick_interval(Duration::from_secs(5));
    LockModule::new(lock, TopicResolver::new("nuki").unwrap(), config)
}

fn populated_lock() -> FakeLock {
    FakeLock {
        state: Some(locked_state()),
        logs: Some(vec![log_entry(5, LoggingType::LockAction, 9, "Ivan")]),
        config: Some(Config::default()),
        battery: Some(BatteryReport {
            battery_voltage: 6_000,
            ..BatteryReport::default()
        }),
        keypad: Some(vec![keypad_entry(1, "Judy")]),
        ..FakeLock::default()
    }
}

fn at(secs: u64) -> Instant {
    Instant::from_secs(secs)
}

// -----------------------------------------------------------------------------
// Startup
// -----------------------------------------------------------------------------

#[test]
fn load_reads_preferences() {
    let mut prefs = MemoryPrefs::default()
        .with_bool(keys::KEYPAD_CONTROL_ENABLED, true)
        .with_string(keys::HASS_DISCOVERY, "homeassistant")
        .with_int(keys::MAX_KEYPAD_CODES, 5);

    let module: Module = LockModule::load(FakeLock::default(), &mut prefs).unwrap();
    let config = module.bridge().config();

    assert!(config.keypad_control_enabled);
    assert!(config.ha_enabled);
    assert_eq!(config.max_keypad_code_count, 5);
    assert_eq!(module.bridge().resolver().prefix(), "nuki");
    assert_eq!(prefs.strings[keys::MQTT_LOCK_PATH], "nuki");
}

#[test]
fn load_refuses_oversized_prefix() {
    let mut prefs = MemoryPrefs::default().with_string(keys::MQTT_LOCK_PATH, &"x".repeat(100));

    let result: Result<Module, _> = LockModule::load(FakeLock::default(), &mut prefs);

    assert!(matches!(result, Err(BridgeError::PrefixTooLong { len: 100, .. })));
}

#[test]
fn connect_subscribes_seeds_and_mirrors_state() {
    let mut runtime = ModuleRuntime::new(module(populated_lock(), false));
    let mut session = Recorder::default();

    runtime.on_connected(&mut session, at(0));
    assert_eq!(session.subscriptions.len(), 6);
    assert_eq!(session.last("nuki/lock/action"), Some("--"));

    session.clear();
    assert_eq!(runtime.poll(&mut session, at(0)), Some(at(5)));

    assert_eq!(session.last("nuki/lock/state"), Some("locked"));
    assert_eq!(session.last("nuki/battery/level"), Some("100"));
    assert!(session.last("nuki/lock/json").is_some());
}

// -----------------------------------------------------------------------------
// Poll cycle
// -----------------------------------------------------------------------------

#[test]
fn unchanged_state_is_not_republished() {
    let mut runtime = ModuleRuntime::new(module(populated_lock(), false));
    let mut session = Recorder::default();

    runtime.on_connected(&mut session, at(0));
    runtime.poll(&mut session, at(0));
    session.clear();

    runtime.poll(&mut session, at(5));
    assert!(session.published.is_empty());

    runtime.module_mut().port_mut().state = Some(KeyTurnerState {
        lock_state: LockState::Unlocking,
        ..locked_state()
    });
    runtime.poll(&mut session, at(10));
    assert_eq!(session.topics(), ["nuki/lock/state", "nuki/lock/json"]);
    assert_eq!(session.last("nuki/lock/state"), Some("unlocking"));
}

#[test]
fn query_is_served_without_waiting_for_the_tick() {
    let mut runtime = ModuleRuntime::new(module(populated_lock(), false));
    let mut session = Recorder::default();

    runtime.on_connected(&mut session, at(0));
    runtime.poll(&mut session, at(0));
    session.clear();

    runtime.on_message(&Publish::new("nuki/query/battery", b"1"), &mut session, at(1));
    assert_eq!(session.last("nuki/query/battery"), Some("0"));

    assert_eq!(runtime.poll(&mut session, at(1)), Some(at(6)));
    assert_eq!(session.last("nuki/battery/voltage"), Some("6.00"));
    assert!(runtime.module().bridge().pending_queries().is_empty());
}

#[test]
fn lockstate_query_publishes_log_then_state() {
    let mut runtime = ModuleRuntime::new(module(populated_lock(), false));
    let mut session = Recorder::default();

    runtime.on_connected(&mut session, at(0));
    runtime.poll(&mut session, at(0));
    session.clear();

    runtime.on_message(&Publish::new("nuki/query/lockstate", b"1"), &mut session, at(2));
    runtime.poll(&mut session, at(2));

    let topics = session.topics();
    let log = topics.iter().position(|t| *t == "nuki/lock/log").unwrap();
    let json = topics.iter().position(|t| *t == "nuki/lock/json").unwrap();
    assert!(log < json);
    assert_eq!(session.last("nuki/lock/authorizationName"), Some("Ivan"));
    assert!(session.last("nuki/lock/json").unwrap().contains(r#""auth_name":"Ivan""#));
}

#[test]
fn poll_reports_first_error_and_finishes_cycle() {
    let mut module: LockModule<FakeLock, 48> = LockModule::new(
        populated_lock(),
        TopicResolver::new("nuki").unwrap(),
        BridgeConfig::new(),
    );
    let mut session = Recorder::default();

    module.bridge_mut().request_query(QueryKind::Config);
    module.bridge_mut().request_query(QueryKind::Battery);

    let result = module.poll(&mut session);

    assert_eq!(result, Err(BridgeError::BufferTooSmall));
    assert!(session.on("nuki/configuration/basicJson").is_empty());
    assert_eq!(session.last("nuki/battery/voltage"), Some("6.00"));
    assert_eq!(session.last("nuki/lock/state"), Some("locked"));
}

// -----------------------------------------------------------------------------
// Reconnect
// -----------------------------------------------------------------------------

#[test]
fn reconnect_republishes_everything_once() {
    let mut runtime = ModuleRuntime::new(module(populated_lock(), true));
    let mut session = Recorder::default();

    runtime.on_connected(&mut session, at(0));
    runtime.poll(&mut session, at(0));
    runtime.on_disconnected();
    session.clear();
    session.subscriptions.clear();

    runtime.on_connected(&mut session, at(30));
    assert_eq!(session.subscriptions.len(), 12);
    assert!(session.published.is_empty(), "defaults are only seeded once");

    runtime.poll(&mut session, at(30));
    assert_eq!(session.last("nuki/lock/state"), Some("locked"));
    assert_eq!(session.last("nuki/lock/trigger"), Some("manual"));
    assert!(session.last("nuki/configuration/basicJson").is_some());
    assert_eq!(session.last("nuki/battery/voltage"), Some("6.00"));
    assert_eq!(session.last("nuki/keypad/code_0/name"), Some("Judy"));
    assert_eq!(session.last("nuki/lock/authorizationId"), Some("9"));

    session.clear();
    runtime.poll(&mut session, at(35));
    assert!(session.published.is_empty());
}

// -----------------------------------------------------------------------------
// Shared module
// -----------------------------------------------------------------------------

#[test]
fn shared_module_serializes_access() {
    let shared: SharedLockModule<NoopRawMutex, FakeLock, 2048> =
        SharedLockModule::new(module(populated_lock(), true));
    let mut session = Recorder::default();

    {
        let mut runtime = ModuleRuntime::new(&shared);
        runtime.on_connected(&mut session, at(0));
        runtime.on_message(&Publish::new("nuki/keypad/command/id", b"3"), &mut session, at(1));
        runtime.on_message(&Publish::new("nuki/keypad/command/action", b"delete"), &mut session, at(1));
        runtime.on_message(&Publish::new("nuki/lock/action", b"lockNgo"), &mut session, at(2));
    }

    shared.lock(|module| {
        let lock = module.port();
        assert_eq!(lock.lock_actions, ["lockNgo"]);
        assert_eq!(lock.keypad_commands[0].id, 3);
        assert_eq!(lock.keypad_commands[0].action, "delete");
    });
    assert_eq!(session.last("nuki/lock/action"), Some("ack"));
    assert_eq!(shared.into_inner().port().restarts, 0);
}
