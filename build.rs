use std::env;
use std::process::Command;

// CPU features that unlock a native backend in this crate
#[derive(PartialEq, Eq, Debug)]
struct CpuFeature {
    name: &'static str,
    target_feature: &'static str,
    target_arches: &'static [&'static str],
    cfg_flag: &'static str,
    detected: bool,
}

impl CpuFeature {
    fn features() -> Vec<CpuFeature> {
        vec![
            CpuFeature {
                name: "sse4_1",
                target_feature: "sse4.1",
                target_arches: &["x86", "x86_64"],
                cfg_flag: "sse",
                detected: false,
            },
            CpuFeature {
                name: "avx2",
                target_feature: "avx2",
                target_arches: &["x86", "x86_64"],
                cfg_flag: "avx2",
                detected: false,
            },
            CpuFeature {
                name: "neon",
                target_feature: "neon",
                target_arches: &["aarch64"],
                cfg_flag: "neon",
                detected: false,
            },
        ]
    }

    fn matches_target(&self, target_arch: &str) -> bool {
        self.target_arches.contains(&target_arch)
    }
}

// Feature detection trait to make implementations more modular
trait CpuFeatureDetector {
    fn detect_features(&self, features: &mut [CpuFeature]);
    fn is_applicable(&self) -> bool;
}

// Linux CPU feature detector
struct LinuxDetector;
impl CpuFeatureDetector for LinuxDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
            let contents = cpuinfo.to_lowercase();
            for feature in features.iter_mut() {
                // aarch64 kernels report NEON as "asimd"
                feature.detected |= match feature.name {
                    "neon" => contents.contains("neon") || contents.contains("asimd"),
                    name => contents.contains(name),
                };
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "linux")
    }
}

// macOS CPU feature detector
struct MacOSDetector;
impl CpuFeatureDetector for MacOSDetector {
    fn detect_features(&self, features: &mut [CpuFeature]) {
        let output = Command::new("sysctl").args(["-a"]).output();

        if let Ok(output) = output {
            let contents = String::from_utf8_lossy(&output.stdout).to_lowercase();

            for feature in features.iter_mut() {
                feature.detected |= match feature.name {
                    "avx2" => contents.contains("hw.optional.avx2_0: 1"),
                    "sse4_1" => contents.contains("hw.optional.sse4_1: 1"),
                    "neon" => {
                        contents.contains("hw.optional.neon: 1")
                            || contents.contains("hw.optional.arm.fp_simd: 1")
                    }
                    _ => false,
                };
            }
        }
    }

    fn is_applicable(&self) -> bool {
        cfg!(target_os = "macos")
    }
}

struct PlatformDetector;
impl PlatformDetector {
    fn cpu_features_detectors() -> Vec<Box<dyn CpuFeatureDetector>> {
        vec![Box::new(LinuxDetector), Box::new(MacOSDetector)]
    }

    fn detect_cpu_features(features: &mut [CpuFeature]) {
        for detector in Self::cpu_features_detectors() {
            if detector.is_applicable() {
                detector.detect_features(features);
                break;
            }
        }
    }

    // Features the compiler was explicitly told to target (`-C target-feature`,
    // `-C target-cpu=native`) are trusted even when cross-compiling.
    fn enabled_target_features(features: &mut [CpuFeature]) {
        let enabled = env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default();
        for feature in features.iter_mut() {
            feature.detected |= enabled.split(',').any(|f| f == feature.target_feature);
        }
    }

    fn apply(features: &[CpuFeature], target_arch: &str) {
        let mut applied = 0;

        for feature in features
            .iter()
            .filter(|feature| feature.detected && feature.matches_target(target_arch))
        {
            println!("cargo:rustc-cfg={}", feature.cfg_flag);
            applied += 1;
        }

        if applied == 0 {
            println!("cargo:rustc-cfg=fallback");
        }

        println!("cargo::rustc-check-cfg=cfg(avx2)");
        println!("cargo::rustc-check-cfg=cfg(sse)");
        println!("cargo::rustc-check-cfg=cfg(neon)");
        println!("cargo::rustc-check-cfg=cfg(fallback)");
    }
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let mut features = CpuFeature::features();

    let host = env::var("HOST").unwrap_or_default();
    let target = env::var("TARGET").unwrap_or_default();
    let target_arch = env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default();

    // Only inspect the machine for native builds
    if host == target {
        PlatformDetector::detect_cpu_features(&mut features);
    }

    PlatformDetector::enabled_target_features(&mut features);

    PlatformDetector::apply(&features, &target_arch);
}
