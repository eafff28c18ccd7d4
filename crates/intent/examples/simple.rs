//! Example: Resolve a few noisy utterances without touching the desktop
//!
//! Uses the dry-run backend, so nothing is launched or deleted.

use voxdesk_intent::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Simple Voice Intent Example ===\n");

    let config = VoiceConfig::from_json_str(
        r#"{
            "apps": {
                "firefox": "firefox",
                "prusa slicer": "prusa-slicer",
                "zotero": "zotero"
            },
            "app_aliases": {"prusa slicer": ["prusse a cela"]},
            "cooldown_ms": 0
        }"#,
    )?;
    config.validate()?;

    let mut context = IntentContext::new(&config);
    let mut actions = DryRunActions::new();

    // What a speech recognizer typically hands over
    let utterances = vec![
        "Ouvre Firefox.",
        "euh ouvre le navigateur",
        "lance prusse à cela",
        "va au bureau dix-sept",
        "maximise la fenêtre",
        "ouvre photoshop",
        "il fait beau",
    ];

    for utterance in utterances {
        println!("Input: \"{}\"", utterance);
        println!("  Intent: {}", context.classify(utterance).kind());

        match context.dispatch(utterance, &mut actions) {
            Some(outcome) => println!("  {}", outcome),
            None => println!("  (ignored)"),
        }
        println!();
    }

    println!("Recorded actions: {:?}", actions.log);
    Ok(())
}
