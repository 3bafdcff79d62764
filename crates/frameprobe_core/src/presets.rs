/// Named targets the user can load with one command.
pub const PRESETS: &[(&str, &str)] = &[
    ("same-origin", "/api/test-pages/same-origin"),
    ("form-test", "/api/test-pages/form-test"),
    ("secure-test", "/api/test-pages/secure-test"),
    ("blocked-test", "/api/test-pages/blocked"),
    ("google", "https://www.google.com"),
    (
        "data-url",
        "data:text/html,<h1 style=\"font-family: Arial; color: %23333; padding: 20px;\">Sample Data URL</h1><p style=\"font-family: Arial; color: %23666; padding: 0 20px;\">This is content from a data URL - fully accessible.</p><script>console.log(\"Data URL script executed\");</script>",
    ),
];

/// Preset whose page refuses to be framed at all.
pub const BLOCKED_PRESET: &str = "blocked-test";

pub fn preset_target(name: &str) -> Option<&'static str> {
    PRESETS
        .iter()
        .find(|(preset, _)| *preset == name)
        .map(|(_, target)| *target)
}
