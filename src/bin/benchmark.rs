use std::time::{Duration, Instant};

use anyhow::Result;
use tcb_scroller::scene::Demo;
use tcb_scroller::scroll::{
    EngineConfig, MarkerStyle, ScrollEngine, ScrollText, WaveformTable, DEFAULT_ESCAPE,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mode {
    Engine,
    Composite,
    Both,
}

struct Args {
    mode: Mode,
    frames: usize,
    texts: usize,
    text_len: usize,
    seed: u64,
    w: usize,
    h: usize,
    style: MarkerStyle,
    ci_smoke: bool,
    quick: bool,
    max_ms: f64,
}

fn parse_args() -> Args {
    let mut args = Args {
        mode: Mode::Both,
        frames: 600,
        texts: 4,
        text_len: 400,
        seed: 0x7cb,
        w: 160,
        h: 88,
        style: MarkerStyle::Hidden,
        ci_smoke: false,
        quick: false,
        max_ms: 20.0,
    };

    let argv = std::env::args().skip(1).collect::<Vec<_>>();
    let mut i = 0usize;
    while i < argv.len() {
        let k = argv[i].as_str();
        let v = argv.get(i + 1).map(|s| s.as_str());
        match (k, v) {
            ("--mode", Some("engine")) => {
                args.mode = Mode::Engine;
                i += 2;
            }
            ("--mode", Some("composite")) => {
                args.mode = Mode::Composite;
                i += 2;
            }
            ("--mode", Some("both")) => {
                args.mode = Mode::Both;
                i += 2;
            }
            ("--frames", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.frames = n.max(1);
                }
                i += 2;
            }
            ("--texts", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.texts = n;
                }
                i += 2;
            }
            ("--text-len", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.text_len = n.max(1);
                }
                i += 2;
            }
            ("--seed", Some(x)) => {
                if let Ok(n) = x.parse::<u64>() {
                    args.seed = n;
                }
                i += 2;
            }
            ("--w", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.w = n.max(1);
                }
                i += 2;
            }
            ("--h", Some(x)) => {
                if let Ok(n) = x.parse::<usize>() {
                    args.h = n.max(1);
                }
                i += 2;
            }
            ("--style", Some("hidden")) => {
                args.style = MarkerStyle::Hidden;
                i += 2;
            }
            ("--style", Some("echo")) => {
                args.style = MarkerStyle::Echo;
                i += 2;
            }
            ("--ci-smoke", Some(x)) if !x.starts_with("--") => {
                args.ci_smoke = parse_bool(x).unwrap_or(true);
                i += 2;
            }
            ("--ci-smoke", _) => {
                args.ci_smoke = true;
                i += 1;
            }
            ("--quick", Some(x)) if !x.starts_with("--") => {
                args.quick = parse_bool(x).unwrap_or(true);
                i += 2;
            }
            ("--quick", _) => {
                args.quick = true;
                i += 1;
            }
            ("--max-ms", Some(x)) => {
                if let Ok(v) = x.parse::<f64>() {
                    args.max_ms = v.max(0.1);
                }
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    if args.quick {
        args.frames = args.frames.min(120);
        args.texts = args.texts.min(2);
    }
    args
}

fn parse_bool(s: &str) -> Option<bool> {
    let v = s.trim().to_ascii_lowercase();
    match v.as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Random scroll text with a waveform marker roughly every dozen glyphs.
fn random_text(rng: &mut fastrand::Rng, len: usize) -> String {
    const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ .,!:;()";
    let mut s = String::with_capacity(len + len / 6);
    while s.len() < len {
        if rng.u8(0..12) == 0 {
            s.push(DEFAULT_ESCAPE);
            s.push(rng.char('0'..='7'));
        } else {
            s.push(ALPHABET[rng.usize(0..ALPHABET.len())] as char);
        }
    }
    s
}

fn cases(args: &Args) -> Result<Vec<(String, ScrollText)>> {
    let mut out = vec![("classic".to_string(), ScrollText::classic())];
    let mut rng = fastrand::Rng::with_seed(args.seed);
    for i in 0..args.texts {
        let text = ScrollText::new(&random_text(&mut rng, args.text_len))?;
        out.push((format!("random#{i}"), text));
    }
    Ok(out)
}

fn engine_for(args: &Args, text: ScrollText) -> Result<ScrollEngine> {
    let cfg = EngineConfig {
        style: args.style,
        ..EngineConfig::default()
    };
    Ok(ScrollEngine::new(text, WaveformTable::classic(), cfg)?)
}

struct Outcome {
    ms: f64,
    lit: usize,
    switches: usize,
}

fn bench_engine(args: &Args, text: ScrollText) -> Result<Outcome> {
    let mut engine = engine_for(args, text)?;
    let mut lit = 0usize;
    let mut switches = 0usize;
    let mut last = engine.active_wave();

    let start = Instant::now();
    for _ in 0..args.frames {
        let frame = engine.build_frame();
        if frame.iter().any(|g| g.is_renderable() && g.glyph != ' ') {
            lit += 1;
        }
        if engine.active_wave() != last {
            last = engine.active_wave();
            switches += 1;
        }
    }
    let ms = start.elapsed().as_secs_f64() * 1000.0 / args.frames as f64;
    Ok(Outcome { ms, lit, switches })
}

fn bench_composite(args: &Args, text: ScrollText) -> Result<Outcome> {
    let mut demo = Demo::new(engine_for(args, text)?);
    let mut lit = 0usize;
    let mut switches = 0usize;
    let mut last = demo.engine().active_wave();

    let start = Instant::now();
    for _ in 0..args.frames {
        demo.tick();
        if demo.engine().active_wave() != last {
            last = demo.engine().active_wave();
            switches += 1;
        }
        let px = demo.render(args.w, args.h);
        if px.chunks_exact(4).any(|p| p[0] != 0 || p[1] != 0 || p[2] != 0) {
            lit += 1;
        }
    }
    let ms = start.elapsed().as_secs_f64() * 1000.0 / args.frames as f64;
    Ok(Outcome { ms, lit, switches })
}

fn run(
    args: &Args,
    label: &str,
    bench: fn(&Args, ScrollText) -> Result<Outcome>,
    slow: &mut Vec<(String, f64)>,
    dark: &mut Vec<String>,
) -> Result<()> {
    let mut total_time = Duration::ZERO;
    let mut total_frames = 0usize;
    println!(
        "{label} benchmark: frames/text={} size={}x{} style={} quick={}",
        args.frames,
        args.w,
        args.h,
        args.style.label(),
        args.quick
    );

    for (idx, (name, text)) in cases(args)?.into_iter().enumerate() {
        let o = bench(args, text)?;
        total_time += Duration::from_secs_f64(o.ms * args.frames as f64 / 1000.0);
        total_frames += args.frames;
        println!(
            "{:>2}. {:<12} {:>8.3} ms/frame  switches={:>3}  lit={:>4}/{}",
            idx, name, o.ms, o.switches, o.lit, args.frames
        );
        if o.lit == 0 {
            dark.push(format!("{label}/{name}"));
        }
        if args.ci_smoke && o.ms > args.max_ms {
            slow.push((format!("{label}/{name}"), o.ms));
        }
    }

    let avg_ms = total_time.as_secs_f64() * 1000.0 / total_frames.max(1) as f64;
    let fps = if avg_ms > 0.0 { 1000.0 / avg_ms } else { 0.0 };
    println!("{label} summary: {:>8.3} ms/frame avg  {:>9.2} FPS", avg_ms, fps);
    Ok(())
}

fn main() -> Result<()> {
    let args = parse_args();
    let mut slow = Vec::new();
    let mut dark = Vec::new();

    if matches!(args.mode, Mode::Engine | Mode::Both) {
        run(&args, "Engine", bench_engine, &mut slow, &mut dark)?;
    }
    if matches!(args.mode, Mode::Composite | Mode::Both) {
        run(&args, "Composite", bench_composite, &mut slow, &mut dark)?;
    }

    if args.ci_smoke {
        if !dark.is_empty() || !slow.is_empty() {
            eprintln!("CI smoke: FAIL");
            if !dark.is_empty() {
                eprintln!("  nothing drawn: {}", dark.join(", "));
            }
            for (name, ms) in slow {
                eprintln!("  slow case: {} ({:.3} ms/frame > {:.3})", name, ms, args.max_ms);
            }
            anyhow::bail!("ci smoke failed");
        }
        println!("CI smoke: PASS (max_ms={:.3})", args.max_ms);
    }

    Ok(())
}
