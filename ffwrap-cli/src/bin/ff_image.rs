use ffwrap_core::operations::ImageToVideo;

fn main() {
    ffwrap_cli::run::<ImageToVideo>()
}
