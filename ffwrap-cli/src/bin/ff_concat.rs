use ffwrap_core::operations::Concat;

fn main() {
    ffwrap_cli::run::<Concat>()
}
