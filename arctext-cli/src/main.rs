use arctext::{ArcText, ArcTextOptions, DrawContext, FontContext, PixmapCanvas, StrategyKind};
use clap::Parser;

/// arctext: render text along a circular arc to a PNG image
#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Text to render
    pub text: String,

    /// Path of the PNG file to write
    #[clap(short, long, default_value = "arctext.png")]
    pub output: String,

    /// Curvature percentage (-100..100); 0 renders flat
    #[clap(short, long, default_value_t = 50.0)]
    pub diameter: f32,

    /// Extra advance per character, in pixels
    #[clap(short, long, default_value_t = 0.0)]
    pub kerning: f32,

    /// Mirror the text to the inside of the arc
    #[clap(short, long)]
    pub flipped: bool,

    /// Rotation of the whole arc, in degrees
    #[clap(short = 'a', long, default_value_t = 180.0)]
    pub start_angle: f32,

    /// CSS font declaration
    #[clap(long, default_value = "32px sans-serif")]
    pub font: String,

    /// Fill color (any CSS color)
    #[clap(long, default_value = "#000000")]
    pub fill: String,

    /// Stroke color (any CSS color); omit to disable stroking
    #[clap(long)]
    pub stroke: Option<String>,

    /// Stroke width in pixels
    #[clap(long, default_value_t = 1.0)]
    pub stroke_width: f32,

    /// Pre-render to a trimmed bitmap instead of drawing vector glyphs
    #[clap(short, long)]
    pub bitmap: bool,

    /// Output image size in pixels (square)
    #[clap(short, long, default_value_t = 512)]
    pub size: u32,
}

fn main() {
    env_logger::init();
    let args: Args = Args::parse();

    let mode = if args.bitmap {
        StrategyKind::Bitmap
    } else {
        StrategyKind::Vector
    };
    let options = ArcTextOptions {
        font: args.font,
        fill: args.fill,
        stroke: args.stroke,
        stroke_width: args.stroke_width,
        diameter: args.diameter,
        kerning: args.kerning,
        flipped: args.flipped,
        start_angle: args.start_angle,
        mode,
    };

    // Load fonts once; layout runs against the same context as rendering
    let mut fonts = FontContext::new();

    let mut text = match ArcText::new(args.text, options, &mut fonts) {
        Ok(text) => text,
        Err(err) => {
            println!("Failed to build curved text: {}", err);
            return;
        }
    };
    log::debug!(
        target: "arctext",
        "object box: {}x{}",
        text.width(),
        text.height()
    );

    let mut canvas = match PixmapCanvas::new(args.size, args.size) {
        Ok(canvas) => canvas,
        Err(err) => {
            println!("Failed to create canvas: {}", err);
            return;
        }
    };

    // Objects render around the origin, so move it to the image center
    let mut painter = canvas.painter(&mut fonts);
    painter.translate(args.size as f32 / 2.0, args.size as f32 / 2.0);
    text.render(&mut painter);

    let png_data = match canvas.to_png(None) {
        Ok(png_data) => png_data,
        Err(err) => {
            println!("Failed to encode PNG: {}", err);
            return;
        }
    };

    match std::fs::write(&args.output, png_data) {
        Ok(_) => {
            println!("Wrote {}", args.output);
        }
        Err(err) => {
            println!("Failed to write output to {}\n{}", args.output, err);
        }
    }
}
