pub fn width() -> usize {
    termsize::get().map(|size| size.cols as usize).unwrap_or(fortpeg_printer::DEFAULT_WIDTH)
}
