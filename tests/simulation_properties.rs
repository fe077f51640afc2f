use distillation_lab_gui::config::LabConfig;
use distillation_lab_gui::simulation::core_algo::{classify_window, drop_rate};
use distillation_lab_gui::simulation::{HeatIntensity, RunState, Simulator};
use proptest::prelude::*;

fn controls() -> impl Strategy<Value = Vec<(u8, bool)>> {
    proptest::collection::vec((0u8..=100, any::<bool>()), 1..120)
}

proptest! {
    #[test]
    fn temperature_and_volume_never_decrease(steps in controls(), ambient in 0.0f64..100.0) {
        let config = LabConfig { ambient_temperature: ambient, ..LabConfig::default() };
        let mut sim = Simulator::new(config);
        sim.start();
        let mut last_temperature = sim.temperature();
        let mut last_volume = sim.volume_ml();
        for (heat, cooling) in steps {
            sim.set_heat_intensity(HeatIntensity::saturating(i64::from(heat)));
            sim.set_cooling(cooling);
            if sim.tick().is_none() {
                break;
            }
            prop_assert!(sim.temperature() >= last_temperature);
            prop_assert!(sim.volume_ml() >= last_volume);
            last_temperature = sim.temperature();
            last_volume = sim.volume_ml();
        }
    }

    #[test]
    fn drop_rate_is_zero_outside_windows(steps in controls()) {
        let config = LabConfig::default();
        let mut sim = Simulator::new(config.clone());
        sim.set_heat_intensity(HeatIntensity::saturating(100));
        sim.start();
        for (heat, cooling) in steps {
            sim.set_heat_intensity(HeatIntensity::saturating(i64::from(heat)));
            sim.set_cooling(cooling);
            if sim.tick().is_none() {
                break;
            }
        }
        for sample in sim.history() {
            let in_ethanol = (78.0..=82.0).contains(&sample.temperature);
            let in_water = sample.temperature > 90.0;
            if !in_ethanol && !in_water {
                prop_assert_eq!(sample.drop_rate, 0);
            }
            prop_assert!(sample.drop_rate <= 3);
        }
    }

    #[test]
    fn history_is_sequential_and_bounded(steps in controls(), budget in 1u32..100) {
        let config = LabConfig { tick_budget: budget, ..LabConfig::default() };
        let mut sim = Simulator::new(config);
        sim.start();
        let mut ticks = 0usize;
        for (heat, _) in steps {
            sim.set_heat_intensity(HeatIntensity::saturating(i64::from(heat)));
            if sim.tick().is_some() {
                ticks += 1;
            }
        }
        prop_assert!(sim.history().len() <= budget as usize);
        prop_assert_eq!(sim.history().len(), ticks);
        for (index, sample) in sim.history().iter().enumerate() {
            prop_assert_eq!(sample.tick as usize, index + 1);
        }
        if ticks == budget as usize {
            prop_assert_eq!(sim.state(), RunState::Finished);
        } else {
            prop_assert_eq!(sim.state(), RunState::Running);
        }
    }

    #[test]
    fn cooling_never_collects_less(temperature in 0.0f64..150.0) {
        let config = LabConfig::default();
        let window = classify_window(&config, temperature);
        prop_assert!(drop_rate(window, true) >= drop_rate(window, false));
    }

    #[test]
    fn start_always_resets(ticks_before in 0usize..120) {
        let mut sim = Simulator::new(LabConfig::default());
        sim.start();
        for _ in 0..ticks_before {
            sim.tick();
        }
        sim.stop();
        prop_assert!(!sim.is_running());
        prop_assert!(sim.start());
        prop_assert_eq!(sim.elapsed(), 0);
        prop_assert_eq!(sim.volume_ml(), 0.0);
        prop_assert!(sim.history().is_empty());
    }
}
