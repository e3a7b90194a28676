//! Tests for core types

#[cfg(test)]
mod tests {
    use super::super::types::*;
    use crate::error::FatigueError;
    use chrono::{Local, TimeZone};

    fn assessment() -> Assessment {
        Assessment {
            status: DriverStatus::Alert,
            confidence: 0.9,
            score: 2.5,
        }
    }

    #[test]
    fn test_time_of_day_parsing() {
        assert_eq!("Morning".parse::<TimeOfDay>().unwrap(), TimeOfDay::Morning);
        assert_eq!("Afternoon".parse::<TimeOfDay>().unwrap(), TimeOfDay::Afternoon);
        assert_eq!("Night".parse::<TimeOfDay>().unwrap(), TimeOfDay::Night);
    }

    #[test]
    fn test_time_of_day_unknown_label() {
        let err = "Evening".parse::<TimeOfDay>().unwrap_err();
        assert!(matches!(err, FatigueError::UnknownLabel(ref label) if label == "Evening"));
        // Labels are case-sensitive
        assert!("night".parse::<TimeOfDay>().is_err());
    }

    #[test]
    fn test_time_of_day_display_round_trips() {
        for tod in TimeOfDay::ALL {
            assert_eq!(tod.to_string().parse::<TimeOfDay>().unwrap(), tod);
        }
    }

    #[test]
    fn test_time_of_day_deserializes_through_parser() {
        let night: TimeOfDay = serde_json::from_str("\"Night\"").unwrap();
        assert_eq!(night, TimeOfDay::Night);

        let err = serde_json::from_str::<TimeOfDay>("\"Evening\"").unwrap_err();
        assert!(err.to_string().contains("Unknown label: Evening"));
    }

    #[test]
    fn test_driver_status_threshold() {
        assert_eq!(DriverStatus::from_score(4.99, 5.0), DriverStatus::Alert);
        assert_eq!(DriverStatus::from_score(5.0, 5.0), DriverStatus::Fatigued);
        assert_eq!(DriverStatus::from_score(12.0, 5.0), DriverStatus::Fatigued);
    }

    #[test]
    fn test_driver_status_class_indices() {
        for status in DriverStatus::CLASSES {
            assert_eq!(DriverStatus::from_class_index(status.class_index()), Some(status));
        }
        assert_eq!(DriverStatus::from_class_index(2), None);
    }

    #[test]
    fn test_driver_input_json_names() {
        let json = serde_json::to_value(DriverInput::default()).unwrap();
        assert_eq!(json["Name"], "Driver 1");
        assert_eq!(json["Sleep_Hours"], 7.0);
        assert_eq!(json["Rest_Breaks"], 30.0);
        assert_eq!(json["Stress_Level"], 4.0);
        assert_eq!(json["Time_of_Day"], "Morning");
    }

    #[test]
    fn test_driver_input_name_defaults() {
        let json = r#"{
            "Sleep_Hours": 6.0,
            "Driving_Hours": 9.0,
            "Caffeine_Cups": 3,
            "Rest_Breaks": 15,
            "Age": 50,
            "Stress_Level": 7,
            "Time_of_Day": "Night"
        }"#;
        let input: DriverInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.name, "Driver 1");
        assert_eq!(input.features.time_of_day, TimeOfDay::Night);
        assert_eq!(input.features.age, 50);
    }

    #[test]
    fn test_default_input_is_valid() {
        assert!(DriverInput::default().validate().is_ok());
    }

    #[test]
    fn test_validation_rejects_negative_quantities() {
        let mut input = DriverInput::default();
        input.features.driving_hours = -1.0;
        let err = input.validate().unwrap_err();
        assert!(matches!(err, FatigueError::InvalidInput { field: "Driving_Hours", .. }));

        let mut input = DriverInput::default();
        input.features.sleep_hours = f64::NAN;
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_validation_stress_bounds() {
        let mut input = DriverInput::default();
        for ok in [1.0, 10.0] {
            input.features.stress_level = ok;
            assert!(input.validate().is_ok());
        }
        for bad in [0.0, 11.0, 4.5] {
            input.features.stress_level = bad;
            assert!(matches!(
                input.validate(),
                Err(FatigueError::InvalidInput { field: "Stress_Level", .. })
            ));
        }
    }

    #[test]
    fn test_validation_rejects_blank_name() {
        let input = DriverInput {
            name: "   ".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            input.validate(),
            Err(FatigueError::InvalidInput { field: "Name", .. })
        ));
    }

    #[test]
    fn test_zero_values_are_valid() {
        let mut input = DriverInput::default();
        input.features.sleep_hours = 0.0;
        input.features.driving_hours = 0.0;
        input.features.caffeine_cups = 0.0;
        input.features.rest_breaks = 0.0;
        input.features.age = 0;
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_record_copies_assessment() {
        let record = PredictionRecord::new(DriverInput::default(), &assessment());
        assert_eq!(record.fatigue_score, 2.5);
        assert_eq!(record.prediction, DriverStatus::Alert);
        assert_eq!(record.confidence, 0.9);
        assert_eq!(record.timestamp.timestamp_subsec_nanos(), 0);
    }

    #[test]
    fn test_record_ids_are_unique() {
        let a = PredictionRecord::new(DriverInput::default(), &assessment());
        let b = PredictionRecord::new(DriverInput::default(), &assessment());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_record_timestamp_format() {
        let ts = Local.with_ymd_and_hms(2026, 1, 2, 23, 4, 5).unwrap();
        let record = PredictionRecord::at(ts, DriverInput::default(), &assessment());
        assert_eq!(record.timestamp_label(), "2026-01-02 23:04:05");

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["Timestamp"], "2026-01-02 23:04:05");
        assert_eq!(json["Id"], record.id.to_string());
        assert!(json.get("id").is_none());
        assert_eq!(json["Prediction"], "Alert");
        assert_eq!(json["Fatigue_Score"], 2.5);

        let back: PredictionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_rejects_bad_timestamp() {
        let mut json =
            serde_json::to_value(PredictionRecord::new(DriverInput::default(), &assessment())).unwrap();
        json["Timestamp"] = serde_json::Value::from("yesterday");
        assert!(serde_json::from_value::<PredictionRecord>(json).is_err());
    }
}
