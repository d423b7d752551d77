use super::*;

#[test]
fn apply_reports_changes_only() {
    let mut c = RenderConfig::default();
    assert!(!Command::SetSide(Side::Front).apply_to(&mut c));
    assert!(Command::SetSide(Side::Back).apply_to(&mut c));
    assert_eq!(c.side, Side::Back);

    assert!(Command::SetPatternScale(80.0).apply_to(&mut c));
    assert!(!Command::SetPatternScale(80.0).apply_to(&mut c));
    assert_eq!(c.pattern_scale, 80.0);

    assert!(!Command::ClearLogo.apply_to(&mut c));
}

#[test]
fn white_spellings_are_the_same_value() {
    let mut c = RenderConfig::default();
    let upper: HexColor = "#FFFFFF".parse().unwrap();
    assert!(!Command::SetBaseColor(upper).apply_to(&mut c));
    let short: HexColor = "#fff".parse().unwrap();
    assert!(!Command::SetBaseColor(short).apply_to(&mut c));
}

#[test]
fn every_setter_targets_its_field() {
    let mut c = RenderConfig::default();
    let cmds = vec![
        Command::SetBaseColor(HexColor::rgb(1, 2, 3)),
        Command::SetColorOpacity(50.0),
        Command::SetColorBrightness(110.0),
        Command::SetColorContrast(90.0),
        Command::SelectPattern(Some(PatternId(4))),
        Command::SetPatternOffset(Vec2::new(5.0, -5.0)),
        Command::SetPatternRotation(45.0),
        Command::SetPatternOpacity(60.0),
        Command::SetLogoSize(80.0),
        Command::SetLogoOffset(Vec2::new(10.0, 20.0)),
        Command::SetLogoBrightness(120.0),
        Command::SetLogoContrast(130.0),
        Command::SetPlayerName("doe".to_string()),
        Command::SetPlayerNumber("9".to_string()),
        Command::SetNameSize(30.0),
        Command::SetNameOffset(Vec2::new(1.0, 2.0)),
        Command::SetNameColor(HexColor::rgb(9, 9, 9)),
        Command::SetNumberSize(100.0),
        Command::SetNumberOffset(Vec2::new(3.0, 4.0)),
        Command::SetNumberColor(HexColor::rgb(8, 8, 8)),
    ];
    for cmd in cmds {
        assert!(cmd.clone().apply_to(&mut c), "{cmd:?} changed nothing");
    }
    assert_eq!(c.base_color, HexColor::rgb(1, 2, 3));
    assert_eq!(c.color_opacity, 50.0);
    assert_eq!(c.color_brightness, 110.0);
    assert_eq!(c.color_contrast, 90.0);
    assert_eq!(c.pattern, Some(PatternId(4)));
    assert_eq!(c.pattern_offset, Vec2::new(5.0, -5.0));
    assert_eq!(c.pattern_rotation_deg, 45.0);
    assert_eq!(c.pattern_opacity, 60.0);
    assert_eq!(c.logo_size, 80.0);
    assert_eq!(c.logo_offset, Vec2::new(10.0, 20.0));
    assert_eq!(c.logo_brightness, 120.0);
    assert_eq!(c.logo_contrast, 130.0);
    assert_eq!(c.player_name, "doe");
    assert_eq!(c.player_number, "9");
    assert_eq!(c.name_size, 30.0);
    assert_eq!(c.name_offset, Vec2::new(1.0, 2.0));
    assert_eq!(c.name_color, HexColor::rgb(9, 9, 9));
    assert_eq!(c.number_size, 100.0);
    assert_eq!(c.number_offset, Vec2::new(3.0, 4.0));
    assert_eq!(c.number_color, HexColor::rgb(8, 8, 8));
}

#[test]
fn commands_parse_from_tagged_json() {
    let cmds = Command::list_from_json(
        r##"[
            {"op": "set_side", "value": "back"},
            {"op": "set_base_color", "value": "#00ff00"},
            {"op": "select_pattern", "value": 12},
            {"op": "select_pattern", "value": null},
            {"op": "set_pattern_offset", "value": {"x": 3.0, "y": -2.0}},
            {"op": "clear_logo"},
            {"op": "set_player_number", "value": "010"}
        ]"##,
    )
    .unwrap();
    assert_eq!(
        cmds,
        vec![
            Command::SetSide(Side::Back),
            Command::SetBaseColor(HexColor::rgb(0, 255, 0)),
            Command::SelectPattern(Some(PatternId(12))),
            Command::SelectPattern(None),
            Command::SetPatternOffset(Vec2::new(3.0, -2.0)),
            Command::ClearLogo,
            Command::SetPlayerNumber("010".to_string()),
        ]
    );
}

#[test]
fn unknown_op_is_serde_error() {
    let err = Command::list_from_json(r#"[{"op": "set_sleeve", "value": 1}]"#).unwrap_err();
    assert!(matches!(err, KitError::Serde(_)));
}
