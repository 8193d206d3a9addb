use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use serde::de::DeserializeOwned;

#[derive(Parser, Debug)]
#[command(name = "captcha", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render a text captcha as a true-color PNG.
    Text(TextArgs),
    /// Render a dot-matrix digit captcha as an indexed PNG.
    Digits(DigitArgs),
    /// Render a spoken-digit captcha as a WAV file.
    Audio(AudioArgs),
}

#[derive(Args, Debug)]
struct OutputArgs {
    /// Output file. Prints a data URI to stdout when omitted.
    #[arg(long)]
    out: Option<PathBuf>,

    /// JSON file with render options; missing fields keep their defaults.
    #[arg(long)]
    opts: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct TextArgs {
    /// Asset root containing `fonts/`.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Font file under `<assets>/fonts/` (repeatable). Defaults to every font found there.
    #[arg(long = "font")]
    fonts: Vec<String>,

    /// Text to draw. A random string is generated when omitted.
    #[arg(long)]
    text: Option<String>,

    /// Length of the generated text.
    #[arg(long, default_value_t = 5)]
    length: usize,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Parser, Debug)]
struct DigitArgs {
    /// Digits to draw, e.g. `482913`. Random digits are generated when omitted.
    #[arg(long)]
    digits: Option<String>,

    /// Number of generated digits.
    #[arg(long, default_value_t = 6)]
    length: usize,

    #[command(flatten)]
    output: OutputArgs,
}

#[derive(Parser, Debug)]
struct AudioArgs {
    /// Asset root containing `sounds/<language>/<digit>.wav`.
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Sound set languages to load (repeatable). The first one is also the fallback.
    #[arg(long = "load", default_value = "en")]
    languages: Vec<String>,

    /// Language to speak; overrides the options file.
    #[arg(long)]
    lang: Option<String>,

    /// Digits to speak. Random digits are generated when omitted.
    #[arg(long)]
    digits: Option<String>,

    /// Number of generated digits.
    #[arg(long, default_value_t = 6)]
    length: usize,

    #[command(flatten)]
    output: OutputArgs,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.cmd {
        Command::Text(args) => cmd_text(args),
        Command::Digits(args) => cmd_digits(args),
        Command::Audio(args) => cmd_audio(args),
    }
}

fn read_opts_json<T: DeserializeOwned + Default>(path: Option<&Path>) -> anyhow::Result<T> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let f = File::open(path).with_context(|| format!("open options '{}'", path.display()))?;
    let opts = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parse options JSON '{}'", path.display()))?;
    Ok(opts)
}

fn parse_digits(
    rng: &captchakit::RandomSource,
    digits: Option<&str>,
    length: usize,
) -> anyhow::Result<Vec<u8>> {
    match digits {
        Some(s) => s
            .chars()
            .map(|c| {
                c.to_digit(10)
                    .map(|d| d as u8)
                    .with_context(|| format!("'{c}' is not a decimal digit"))
            })
            .collect(),
        None => (0..length)
            .map(|_| Ok(rng.below(10)? as u8))
            .collect::<captchakit::CaptchaResult<Vec<u8>>>()
            .map_err(Into::into),
    }
}

fn font_names(assets: &Path, requested: Vec<String>) -> anyhow::Result<Vec<String>> {
    if !requested.is_empty() {
        return Ok(requested);
    }
    let dir = assets.join("fonts");
    let mut names = Vec::new();
    for entry in std::fs::read_dir(&dir)
        .with_context(|| format!("list fonts in '{}'", dir.display()))?
    {
        let path = entry?.path();
        let is_font = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"));
        if let (true, Some(name)) = (is_font, path.file_name().and_then(|n| n.to_str())) {
            names.push(name.to_string());
        }
    }
    names.sort();
    anyhow::ensure!(!names.is_empty(), "no fonts found in '{}'", dir.display());
    Ok(names)
}

fn emit(item: &dyn captchakit::Item, out: Option<&Path>) -> anyhow::Result<()> {
    let Some(out) = out else {
        println!("{}", item.to_data_uri()?);
        return Ok(());
    };
    if let Some(parent) = out.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    let mut f = File::create(out).with_context(|| format!("create '{}'", out.display()))?;
    let n = item.write_to(&mut f)?;
    eprintln!("wrote {} ({n} bytes)", out.display());
    Ok(())
}

fn cmd_text(args: TextArgs) -> anyhow::Result<()> {
    let mut opts: captchakit::CharCaptchaOpts = read_opts_json(args.output.opts.as_deref())?;
    let names = font_names(&args.assets, args.fonts)?;
    let name_refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let provider = captchakit::FsAssetProvider::new(&args.assets);
    let store = captchakit::AssetStore::prepare(&provider, &name_refs, &[])?;
    if opts.fonts.is_empty() {
        opts.fonts = names;
    }

    let rng = captchakit::RandomSource::os();
    let text = match args.text {
        Some(t) => t,
        None => captchakit::random_text(
            &rng,
            args.length,
            &format!("{}{}", captchakit::TXT_NUMBERS, captchakit::TXT_ALPHABET),
        )?,
    };
    let canvas = captchakit::render_char_captcha(&rng, &store, &text, &opts)?;
    eprintln!("answer: {text}");
    emit(&canvas, args.output.out.as_deref())
}

fn cmd_digits(args: DigitArgs) -> anyhow::Result<()> {
    let opts: captchakit::DigitCaptchaOpts = read_opts_json(args.output.opts.as_deref())?;
    let rng = captchakit::RandomSource::os();
    let digits = parse_digits(&rng, args.digits.as_deref(), args.length)?;
    let canvas = captchakit::render_digit_captcha(&rng, &digits, &opts)?;
    eprintln!("answer: {}", digits_string(&digits));
    emit(&canvas, args.output.out.as_deref())
}

fn cmd_audio(args: AudioArgs) -> anyhow::Result<()> {
    let mut opts: captchakit::AudioCaptchaOpts = read_opts_json(args.output.opts.as_deref())?;
    if let Some(lang) = args.lang {
        opts.language = lang;
    }
    let langs: Vec<&str> = args.languages.iter().map(String::as_str).collect();
    let provider = captchakit::FsAssetProvider::new(&args.assets);
    let mut builder = captchakit::AssetStore::builder();
    for lang in &langs {
        let set = captchakit::AssetProvider::load_sound_set(&provider, lang)?;
        builder = builder.sound_set(*lang, set);
    }
    if let Some(first) = langs.first() {
        builder = builder.default_language(*first);
    }
    let store = builder.build();

    let rng = captchakit::RandomSource::os();
    let digits = parse_digits(&rng, args.digits.as_deref(), args.length)?;
    let audio = captchakit::render_audio_captcha(&rng, &store, &digits, &opts)?;
    eprintln!("answer: {}", digits_string(&digits));
    emit(&audio, args.output.out.as_deref())
}

fn digits_string(digits: &[u8]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}
