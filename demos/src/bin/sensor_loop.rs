use std::rc::Rc;

use msgbus::{
    init_logging, log_error_report, BusConfig, DeferredBus, LoggingConfig, MessageBus,
    MsgbusResult,
};

/// Показание датчика: (номер канала, значение АЦП).
type Reading = (u8, u16);

/// Пример кооперативного цикла: прерывания складывают события в отложенную
/// шину, цикл на каждой итерации выполняет очередь, обработчики публикуют
/// состояние в синхронную шину с кэшем последнего значения.
fn main() -> MsgbusResult<()> {
    init_logging(&LoggingConfig::load()?)?;
    if let Err(e) = run() {
        log_error_report(&e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> MsgbusResult<()> {
    let config = BusConfig::load()?;

    let events = Rc::new(DeferredBus::with_config(&config));
    let state = Rc::new(MessageBus::with_config(&config));

    // Масштабирование сырого значения и публикация состояния
    let state_for_adc = state.clone();
    events.subscribe("adc", move |(channel, raw): Reading| {
        let millivolts = u32::from(raw) * 3300 / 4095;
        if let Err(e) = state_for_adc.publish_and_store("voltage", (channel, millivolts)) {
            tracing::error!(error = %e, "failed to publish voltage");
        }
    });

    // Кнопка переключает режим, повторная публикация идёт в ту же очередь
    let events_for_button = events.clone();
    let state_for_button = state.clone();
    events.subscribe("button", move |pressed: bool| {
        if !pressed {
            return;
        }
        let next = match state_for_button.get_latest_message::<String>("mode") {
            Ok(Some(mode)) if mode.as_str() == "run" => "idle",
            _ => "run",
        };
        if state_for_button
            .publish_and_store("mode", next.to_string())
            .is_ok()
        {
            events_for_button.publish("mode_changed", next);
        }
    });

    events.subscribe("mode_changed", |mode: &'static str| {
        println!("  mode changed -> {mode}");
    });

    state.subscribe("voltage", |(channel, mv): (u8, u32)| {
        println!("  channel {channel}: {mv} mV");
    });

    let script: [&[(&str, Reading)]; 3] = [
        &[("adc", (0, 1024)), ("adc", (1, 4095))],
        &[("adc", (0, 2048))],
        &[],
    ];

    for (tick, adc_events) in script.iter().enumerate() {
        println!("tick {tick}");
        // Имитация прерываний
        for &(topic, reading) in adc_events.iter() {
            events.publish(topic, reading);
        }
        if tick != 2 {
            events.publish("button", true);
        }

        let drained = events.drain();
        tracing::debug!(tick, ?drained, "loop iteration finished");
    }

    if let Some(last) = state.get_latest_message::<(u8, u32)>("voltage")? {
        println!("last voltage: channel {} = {} mV", last.0, last.1);
    }
    println!("bus stats: {:?}", state.stats());
    Ok(())
}
