use super::*;

#[test]
fn args_wrap_input_and_output() {
    let args = FfmpegCompressor::args(Path::new("in.mp4"), Path::new("out.mp4"));
    let args: Vec<String> = args.into_iter().map(|a| a.to_string_lossy().into_owned()).collect();
    assert_eq!(&args[..3], ["-y", "-i", "in.mp4"]);
    assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
    let joined = args.join(" ");
    assert!(joined.contains("-vcodec libx264"));
    assert!(joined.contains("-crf 28"));
    assert!(joined.contains("-acodec aac"));
    assert!(joined.contains("-movflags faststart"));
}

#[test]
fn stderr_tail_keeps_short_output() {
    assert_eq!(stderr_tail("boom"), "boom");
}

#[test]
fn stderr_tail_truncates_from_the_front() {
    let long = format!("{}END", "x".repeat(STDERR_TAIL_CHARS * 2));
    let tail = stderr_tail(&long);
    assert_eq!(tail.chars().count(), STDERR_TAIL_CHARS);
    assert!(tail.ends_with("END"));
}

#[tokio::test]
async fn missing_binary_is_a_spawn_error() {
    let compressor = FfmpegCompressor::new("veda-no-such-encoder-binary");
    let err = compressor
        .compress(Path::new("in.mp4"), Path::new("out.mp4"))
        .await
        .unwrap_err();
    assert!(matches!(err, CompressionError::Spawn { ref bin, .. } if bin == "veda-no-such-encoder-binary"));
}

#[cfg(unix)]
#[tokio::test]
async fn non_zero_exit_is_a_failure() {
    let compressor = FfmpegCompressor::new("false");
    let err = compressor
        .compress(Path::new("in.mp4"), Path::new("out.mp4"))
        .await
        .unwrap_err();
    assert!(matches!(err, CompressionError::Failed { status: Some(1), .. }));
}
