use argh::FromArgs;
use darkhelp::{
    image::{Image, ImageSize},
    imgproc::{color, resize},
    io::functional as F,
    sync::SlotChannel,
};
use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Instant,
};

fn parse_size(value: &str) -> Result<ImageSize, String> {
    let (width, height) = value
        .split_once('x')
        .ok_or_else(|| format!("expected WxH, got {value:?}"))?;
    let width: usize = width.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let height: usize = height.trim().parse().map_err(|e| format!("bad height: {e}"))?;

    if width < 10 || height < 10 {
        return Err(format!("size must be at least 10x10, got {width}x{height}"));
    }

    Ok(ImageSize { width, height })
}

#[derive(FromArgs, Debug)]
/// Decode images on a producer thread and resize them on a consumer thread
struct Args {
    /// the images to process
    #[argh(positional)]
    images: Vec<PathBuf>,

    /// directory where the resized images are written
    #[argh(option, short = 'o', default = "PathBuf::from(\"resized\")")]
    output_dir: PathBuf,

    /// the size the images must fit in, e.g. 640x480
    #[argh(option, short = 's', default = "ImageSize { width: 640, height: 480 }", from_str_fn(parse_size))]
    size: ImageSize,

    /// drop frames the consumer is too slow for instead of waiting
    #[argh(switch)]
    overwrite: bool,

    /// convert the images to greyscale
    #[argh(switch, short = 'g')]
    greyscale: bool,
}

struct Frame {
    index: usize,
    path: PathBuf,
    image: Image<u8, 3>,
}

fn to_greyscale(image: &Image<u8, 3>) -> Result<Image<u8, 3>, Box<dyn std::error::Error>> {
    let mut gray = Image::<u8, 1>::from_size_val(image.size(), 0)?;
    color::gray_from_rgb_u8(image, &mut gray)?;
    let mut rgb = Image::<u8, 3>::from_size_val(image.size(), 0)?;
    color::rgb_from_gray_u8(&gray, &mut rgb)?;
    Ok(rgb)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Args = argh::from_env();

    if args.images.is_empty() {
        return Err("no images given".into());
    }
    std::fs::create_dir_all(&args.output_dir)?;

    // create a cancel token to stop reading images
    let cancel_token = Arc::new(AtomicBool::new(false));

    ctrlc::set_handler({
        let cancel_token = cancel_token.clone();
        move || {
            log::info!("Received Ctrl-C signal. Sending cancel signal !!");
            cancel_token.store(true, Ordering::SeqCst);
        }
    })?;

    // `None` tells the consumer there is nothing left
    let channel = Arc::new(SlotChannel::<Option<Frame>>::new(!args.overwrite));

    let producer = std::thread::spawn({
        let channel = channel.clone();
        let cancel_token = cancel_token.clone();
        let images = args.images.clone();
        move || {
            let mut sent = 0;
            for (index, path) in images.into_iter().enumerate() {
                if cancel_token.load(Ordering::SeqCst) {
                    break;
                }
                match F::read_image_any_rgb8(&path) {
                    Ok(image) => {
                        log::debug!("decoded {} ({})", path.display(), image.size());
                        channel.send(Some(Frame { index, path, image }));
                        sent += 1;
                    }
                    Err(e) => log::warn!("skipping {}: {e}", path.display()),
                }
            }
            channel.send(None);
            sent
        }
    });

    let mut written = 0;
    while let Some(frame) = channel.receive() {
        let start = Instant::now();

        let image = if args.greyscale {
            to_greyscale(&frame.image)?
        } else {
            frame.image
        };
        let resized = resize::resize_keeping_aspect_ratio(&image, args.size)?;

        let stem = frame
            .path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| format!("frame{}", frame.index));
        let output = args
            .output_dir
            .join(format!("{:04}_{stem}_{}.png", frame.index, resized.size()));
        F::write_image_png_rgb8(&output, &resized)?;
        written += 1;

        log::info!(
            "{} -> {} in {:?}",
            frame.path.display(),
            output.display(),
            start.elapsed()
        );
    }

    let sent = producer
        .join()
        .map_err(|_| "the producer thread panicked")?;

    log::info!(
        "decoded {sent} images, wrote {written}, dropped {}",
        sent - written
    );

    Ok(())
}
