//! The traffic light entity and its color resolution.

use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::color::{Color, LightVariant, SupportedSystem};
use crate::config::{duration, LightConfig};
use crate::error::LightError;

/// One simulated traffic light.
///
/// Timing fields are fixed at construction. Only the signal counter moves
/// afterwards, through [`TrafficLight::increment`] and
/// [`TrafficLight::set_signal_count`].
///
/// `updated_at` is stamped at construction and is not refreshed when the
/// counter changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrafficLight {
    id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
    green_time: u32,
    yellow_time: u32,
    red_time: u32,
    total_time: u64,
    cycle_repeat_amount: Option<u32>,
    signal_count: i64,
    supported_systems: Vec<SupportedSystem>,
    supported_colors: Vec<Color>,
    supported_light_type: LightVariant,
}

impl TrafficLight {
    /// Validate `config` and build a light from it.
    ///
    /// A config without an id gets a fresh v4 UUID. Both timestamps are set
    /// to the current UTC time.
    pub fn new(config: &LightConfig) -> Result<Self, LightError> {
        let phases = config.validate()?;
        let cycle_repeat_amount = config
            .cycle_repeat_amount
            .map(|amount| duration("cycle_repeat_amount", amount))
            .transpose()?;
        let now = OffsetDateTime::now_utc();

        Ok(TrafficLight {
            id: config.id.unwrap_or_else(Uuid::new_v4),
            created_at: now,
            updated_at: now,
            green_time: phases.green,
            yellow_time: phases.yellow,
            red_time: phases.red,
            total_time: phases.total(),
            cycle_repeat_amount,
            signal_count: config.signal_count,
            supported_systems: vec![SupportedSystem::TrafficLight],
            supported_colors: Color::ALL.to_vec(),
            supported_light_type: config.supported_light_type,
        })
    }

    /// Shorthand for a standard light with the given phase durations.
    pub fn with_times(green_time: i64, yellow_time: i64, red_time: i64) -> Result<Self, LightError> {
        TrafficLight::new(&LightConfig::new(green_time, yellow_time, red_time))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn updated_at(&self) -> OffsetDateTime {
        self.updated_at
    }

    pub fn green_time(&self) -> u32 {
        self.green_time
    }

    pub fn yellow_time(&self) -> u32 {
        self.yellow_time
    }

    pub fn red_time(&self) -> u32 {
        self.red_time
    }

    /// Length of one full cycle in ticks. Always positive.
    pub fn total_time(&self) -> u64 {
        self.total_time
    }

    pub fn cycle_repeat_amount(&self) -> Option<u32> {
        self.cycle_repeat_amount
    }

    pub fn signal_count(&self) -> i64 {
        self.signal_count
    }

    pub fn supported_systems(&self) -> &[SupportedSystem] {
        &self.supported_systems
    }

    pub fn supported_colors(&self) -> &[Color] {
        &self.supported_colors
    }

    pub fn supported_light_type(&self) -> LightVariant {
        self.supported_light_type
    }

    /// Advance the counter by `steps` ticks, saturating at `i64::MAX`.
    pub fn increment(&mut self, steps: u32) {
        self.signal_count = self.signal_count.saturating_add(i64::from(steps));
    }

    /// Advance the counter by one tick.
    pub fn tick(&mut self) {
        self.increment(1);
    }

    /// Overwrite the counter. Any value is accepted, negative included.
    pub fn set_signal_count(&mut self, value: i64) {
        self.signal_count = value;
    }

    /// Position of the counter within the current cycle, in `[0, total_time)`.
    pub fn cycle_position(&self) -> Result<u64, LightError> {
        let total = i64::try_from(self.total_time)
            .ok()
            .filter(|t| *t > 0)
            .ok_or_else(|| LightError::InvariantViolation {
                message: format!("total_time {} is not a usable cycle length", self.total_time),
            })?;
        // rem_euclid keeps negative counters inside the cycle too.
        Ok(self.signal_count.rem_euclid(total) as u64)
    }

    /// The color shown at the current tick.
    ///
    /// Phases occupy half-open ranges in the order green, yellow, red; a
    /// phase with zero duration is never selected.
    pub fn color(&self) -> Result<Color, LightError> {
        let position = self.cycle_position()?;
        let (color, _) = self.locate(position)?;
        Ok(color)
    }

    /// Ticks left before the current phase ends, counting the current one.
    pub fn phase_remaining(&self) -> Result<u64, LightError> {
        let position = self.cycle_position()?;
        let (_, phase_end) = self.locate(position)?;
        Ok(phase_end - position)
    }

    fn locate(&self, position: u64) -> Result<(Color, u64), LightError> {
        let green_end = u64::from(self.green_time);
        let yellow_end = green_end + u64::from(self.yellow_time);

        if position < green_end {
            Ok((Color::Green, green_end))
        } else if position < yellow_end {
            Ok((Color::Yellow, yellow_end))
        } else if position < self.total_time {
            Ok((Color::Red, self.total_time))
        } else {
            Err(LightError::InvariantViolation {
                message: format!(
                    "cycle position {} outside of every phase (total_time {})",
                    position, self.total_time
                ),
            })
        }
    }

    /// Fail unless this light has a display.
    pub fn ensure_renderable(&self) -> Result<(), LightError> {
        match self.supported_light_type {
            LightVariant::Standard => Ok(()),
            other => Err(LightError::UnsupportedLightType { light_type: other }),
        }
    }

    /// The input that would rebuild this light under the same id.
    pub fn config(&self) -> LightConfig {
        LightConfig {
            id: Some(self.id),
            green_time: i64::from(self.green_time),
            yellow_time: i64::from(self.yellow_time),
            red_time: i64::from(self.red_time),
            cycle_repeat_amount: self.cycle_repeat_amount.map(i64::from),
            signal_count: self.signal_count,
            supported_light_type: self.supported_light_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standard() -> TrafficLight {
        TrafficLight::with_times(10, 5, 10).unwrap()
    }

    fn color_at(light: &mut TrafficLight, count: i64) -> Color {
        light.set_signal_count(count);
        light.color().unwrap()
    }

    #[test]
    fn total_time_is_sum_of_phases() {
        let light = standard();
        assert_eq!(light.total_time(), 25);
    }

    #[test]
    fn wraparound_table() {
        let mut light = standard();
        for count in 0..10 {
            assert_eq!(color_at(&mut light, count), Color::Green, "count {}", count);
        }
        for count in 10..15 {
            assert_eq!(color_at(&mut light, count), Color::Yellow, "count {}", count);
        }
        for count in 15..25 {
            assert_eq!(color_at(&mut light, count), Color::Red, "count {}", count);
        }
        assert_eq!(color_at(&mut light, 25), Color::Green);
        assert_eq!(color_at(&mut light, 35), Color::Yellow);
        assert_eq!(color_at(&mut light, 41), Color::Red);
    }

    #[test]
    fn zero_yellow_goes_straight_to_red() {
        let mut light = TrafficLight::with_times(2, 0, 2).unwrap();
        let seen: Vec<Color> = (0..4).map(|c| color_at(&mut light, c)).collect();
        assert_eq!(seen, vec![Color::Green, Color::Green, Color::Red, Color::Red]);
    }

    #[test]
    fn red_only_light_is_always_red() {
        let mut light = TrafficLight::with_times(0, 0, 3).unwrap();
        for count in 0..9 {
            assert_eq!(color_at(&mut light, count), Color::Red);
        }
    }

    #[test]
    fn negative_counts_stay_in_cycle() {
        let mut light = standard();
        // -1 mod 25 = 24
        assert_eq!(color_at(&mut light, -1), Color::Red);
        // -15 mod 25 = 10
        assert_eq!(color_at(&mut light, -15), Color::Yellow);
        light.set_signal_count(-26);
        assert_eq!(light.cycle_position().unwrap(), 24);
    }

    #[test]
    fn increment_once_from_zero() {
        let mut light = standard();
        assert_eq!(light.signal_count(), 0);
        light.tick();
        assert_eq!(light.signal_count(), 1);
        light.increment(4);
        assert_eq!(light.signal_count(), 5);
    }

    #[test]
    fn increment_saturates() {
        let mut light = standard();
        light.set_signal_count(i64::MAX - 1);
        light.increment(10);
        assert_eq!(light.signal_count(), i64::MAX);
        assert!(light.color().is_ok());
    }

    #[test]
    fn set_signal_count_past_cycle_matches_wrapped_count() {
        let mut light = standard();
        let at_one = color_at(&mut light, 1);
        assert_eq!(color_at(&mut light, 26), at_one);
    }

    #[test]
    fn phase_remaining_counts_down() {
        let mut light = standard();
        light.set_signal_count(0);
        assert_eq!(light.phase_remaining().unwrap(), 10);
        light.set_signal_count(9);
        assert_eq!(light.phase_remaining().unwrap(), 1);
        light.set_signal_count(12);
        assert_eq!(light.phase_remaining().unwrap(), 3);
        light.set_signal_count(24);
        assert_eq!(light.phase_remaining().unwrap(), 1);
    }

    #[test]
    fn rejection_cases() {
        assert!(TrafficLight::with_times(-1, 5, 10).unwrap_err().is_validation());
        assert!(TrafficLight::with_times(0, 0, 0).unwrap_err().is_validation());
        let err = TrafficLight::new(&LightConfig::new(1, 1, 1).with_cycle_repeat_amount(-1))
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn construction_keeps_supplied_id_and_counter() {
        let id = Uuid::new_v4();
        let config = LightConfig {
            id: Some(id),
            ..LightConfig::new(1, 2, 3).with_signal_count(7)
        };
        let light = TrafficLight::new(&config).unwrap();
        assert_eq!(light.id(), id);
        assert_eq!(light.signal_count(), 7);
        assert_eq!(light.created_at(), light.updated_at());
    }

    #[test]
    fn fresh_ids_are_unique() {
        assert_ne!(standard().id(), standard().id());
    }

    #[test]
    fn counter_changes_do_not_touch_updated_at() {
        let mut light = standard();
        let before = light.updated_at();
        light.increment(3);
        assert_eq!(light.updated_at(), before);
    }

    #[test]
    fn only_standard_lights_render() {
        assert!(standard().ensure_renderable().is_ok());
        let config = LightConfig {
            supported_light_type: LightVariant::Flashing,
            ..LightConfig::new(1, 1, 1)
        };
        let err = TrafficLight::new(&config).unwrap().ensure_renderable().unwrap_err();
        assert_eq!(
            err,
            LightError::UnsupportedLightType {
                light_type: LightVariant::Flashing
            }
        );
    }

    #[test]
    fn config_round_trips() {
        let config = LightConfig::new(3, 2, 1).with_cycle_repeat_amount(4);
        let light = TrafficLight::new(&config).unwrap();
        let back = light.config();
        assert_eq!(back.id, Some(light.id()));
        assert_eq!(
            LightConfig { id: None, ..back },
            config
        );
    }

    #[test]
    fn serializes_metadata_and_rfc3339_timestamps() {
        let light = standard();
        let json = serde_json::to_value(&light).unwrap();
        assert_eq!(json["total_time"], 25);
        assert_eq!(json["supported_systems"], serde_json::json!(["TRAFFIC LIGHT"]));
        assert_eq!(
            json["supported_colors"],
            serde_json::json!(["GREEN", "YELLOW", "RED"])
        );
        assert_eq!(json["supported_light_type"], "STANDARD");
        assert!(json["cycle_repeat_amount"].is_null());
        let created = json["created_at"].as_str().unwrap();
        assert!(created.contains('T'), "not RFC 3339: {}", created);
    }
}
