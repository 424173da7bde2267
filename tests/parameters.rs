mod tests {
    use vehicle_light_engine::{
        Animation, AnimationParameters, AnimationRequest, Rgb, SpeedType, ValidationError,
        WireColor,
    };

    fn request(animation: u8, speed_type: u8, user_defined_speed: i32) -> AnimationRequest {
        AnimationRequest {
            animation,
            custom_color: WireColor { r: 10, g: 20, b: 30 },
            speed_type,
            user_defined_speed,
            brightness: 200,
        }
    }

    #[test]
    fn test_parse_start_request() {
        let json = r#"{
            "animation": 5,
            "customColor": { "r": 255, "g": 0, "b": 0 },
            "speedType": 1,
            "userDefinedSpeed": 0,
            "brightness": 64
        }"#;
        let request: AnimationRequest = serde_json::from_str(json).unwrap();
        let parameters = AnimationParameters::try_from(request).unwrap();

        assert_eq!(
            parameters,
            AnimationParameters {
                animation: Animation::ColorPulse,
                custom_color: Rgb::new(255, 0, 0),
                speed_type: SpeedType::VehicleSpeed,
                user_defined_speed: 0,
                brightness: 64,
            }
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let json = r#"{ "animation": 1, "speedType": 0 }"#;
        let request: AnimationRequest = serde_json::from_str(json).unwrap();
        let parameters = AnimationParameters::try_from(request).unwrap();

        assert_eq!(parameters.animation, Animation::Rainbow);
        assert_eq!(parameters.custom_color, Rgb::new(0, 0, 0));
        assert_eq!(parameters.user_defined_speed, 0);
        assert_eq!(parameters.brightness, 0);
    }

    #[test]
    fn test_rejects_unknown_animation() {
        assert_eq!(
            AnimationParameters::try_from(request(7, 0, 100)),
            Err(ValidationError::UnknownAnimation(7))
        );
    }

    #[test]
    fn test_rejects_unknown_speed_type() {
        assert_eq!(
            AnimationParameters::try_from(request(1, 3, 100)),
            Err(ValidationError::UnknownSpeedType(3))
        );
    }

    #[test]
    fn test_rejects_speed_out_of_range() {
        assert_eq!(
            AnimationParameters::try_from(request(1, 0, 256)),
            Err(ValidationError::SpeedOutOfRange(256))
        );
        assert_eq!(
            AnimationParameters::try_from(request(1, 0, -1)),
            Err(ValidationError::SpeedOutOfRange(-1))
        );
        assert!(AnimationParameters::try_from(request(1, 0, 255)).is_ok());
    }

    #[test]
    fn test_request_from_parameters() {
        let parameters = AnimationParameters::try_from(request(6, 2, 42)).unwrap();
        assert_eq!(parameters.speed_type, SpeedType::EngineRpm);
        assert_eq!(AnimationRequest::from(parameters), request(6, 2, 42));
    }

    #[test]
    fn test_speed_type_uses_telemetry() {
        assert!(!SpeedType::UserDefined.uses_telemetry());
        assert!(SpeedType::VehicleSpeed.uses_telemetry());
        assert!(SpeedType::EngineRpm.uses_telemetry());
        assert_eq!(SpeedType::from_raw(2), Some(SpeedType::EngineRpm));
        assert_eq!(SpeedType::from_raw(3), None);
    }
}
