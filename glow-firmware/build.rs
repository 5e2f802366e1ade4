// Build-Script: Wird vor dem Kompilieren ausgeführt
// Konfiguriert den Linker für ESP32-C6 Embedded Rust

/// Environment-Variablen die in den Code eingebacken werden
/// (gelesen mit option_env!, beide optional)
const FORWARDED_VARS: [&str; 2] = ["GLOW_MODE", "GLOW_DEVICE_NAME"];

fn main() {
    // Lade .env file für Modus und Gerätename
    // Fehlt die Datei, gelten die Defaults aus config.rs
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("ℹ️  .env file nicht gefunden: {}", e);
        eprintln!("   Nutze Defaults (GLOW_MODE=notify, GLOW_DEVICE_NAME=Glow)");
    }

    for var in FORWARDED_VARS {
        println!("cargo:rerun-if-env-changed={}", var);
        if let Ok(value) = std::env::var(var) {
            println!("cargo:rustc-env={}={}", var, value);
        }
    }

    // Registriere hilfsbereiten Error-Handler für Linker-Fehler
    linker_be_nice();

    // 1. defmt.x - defmt Logging-Support
    println!("cargo:rustc-link-arg=-Tdefmt.x");

    // 2. linkall.x - ESP32 Memory-Layout
    //    WICHTIG: Muss als LETZTES kommen
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

// Error-Handler: Zeigt hilfreiche Tipps bei Linker-Fehlern
// Wird vom Linker als "--error-handling-script" aufgerufen
fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 2 {
        let kind = &args[1]; // Fehler-Typ (z.B. "undefined-symbol")
        let what = &args[2]; // Symbol-Name (z.B. "_defmt_...")

        if kind != "undefined-symbol" {
            std::process::exit(1);
        }

        let hint = match what.as_str() {
            what if what.starts_with("_defmt_") => Some(
                "`defmt` not found - make sure `defmt.x` is added as a linker script",
            ),
            "_stack_start" => Some("Is the linker script `linkall.x` missing?"),
            what if what.starts_with("esp_rtos_") => Some(
                "`esp-radio` has no scheduler enabled. Make sure you have initialized `esp-rtos`.",
            ),
            "free" | "malloc" | "calloc" | "malloc_internal" | "free_internal" => {
                Some("Did you forget the `esp-alloc` dependency?")
            }
            _ => None,
        };
        if let Some(hint) = hint {
            eprintln!();
            eprintln!("💡 {}", hint);
            eprintln!();
        }

        std::process::exit(0);
    }

    if let Ok(exe) = std::env::current_exe() {
        println!(
            "cargo:rustc-link-arg=--error-handling-script={}",
            exe.display()
        );
    }
}
