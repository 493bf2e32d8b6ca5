use crate::image_pipeline::common::error::ConversionError;
use crate::image_pipeline::cv_core::{
    apply_ccm, apply_rgb_gain, bayer_rggb_to_rgb, bayer_rggb_to_rggb, bayer_to_bayer_rggb, normalize,
    rggb_to_bayer_rggb,
};
use crate::image_pipeline::raw_array::{ColorLayout, ElementType, RawArray, Sample};

fn filled<T: Sample>(height: usize, width: usize, channels: usize, layout: ColorLayout, values: &[T]) -> RawArray<'static> {
    let mut array = RawArray::allocate(height, width, channels, T::ELEMENT_TYPE, layout);
    fill(&mut array, values);
    array
}

fn fill<T: Sample>(array: &mut RawArray<'_>, values: &[T]) {
    let [height, width, channels] = array.dims();
    let mut it = values.iter().copied();
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                if let Some(v) = it.next() {
                    array.set(y, x, c, v);
                }
            }
        }
    }
}

/// Byte strides with `pixel_pad` spare bytes after every pixel and
/// `row_pad` after every row.
fn padded_strides(width: usize, channels: usize, dtype: ElementType, pixel_pad: usize, row_pad: usize) -> [usize; 3] {
    let item = dtype.size();
    let pixel = channels * item + pixel_pad;
    [width * pixel + row_pad, pixel, item]
}

/// Bytes needed to back a buffer with the given shape and strides.
fn backing_len(dims: [usize; 3], strides: [usize; 3]) -> usize {
    dims[0] * strides[0]
}

/// True when every byte not addressed by `dims`/`strides` still holds `sentinel`.
fn padding_untouched(memory: &[u8], dims: [usize; 3], strides: [usize; 3], item: usize, sentinel: u8) -> bool {
    let mut addressed = vec![false; memory.len()];
    for y in 0..dims[0] {
        for x in 0..dims[1] {
            for c in 0..dims[2] {
                let offset = y * strides[0] + x * strides[1] + c * strides[2];
                addressed[offset..offset + item].iter_mut().for_each(|a| *a = true);
            }
        }
    }
    memory.iter().zip(addressed).all(|(&b, used)| used || b == sentinel)
}

fn samples<T: Sample>(array: &RawArray<'_>) -> Vec<T> {
    let [height, width, channels] = array.dims();
    let mut out = Vec::with_capacity(height * width * channels);
    for y in 0..height {
        for x in 0..width {
            for c in 0..channels {
                out.push(array.get::<T>(y, x, c));
            }
        }
    }
    out
}

fn ramp(n: usize) -> Vec<u16> {
    (0..n as u16).map(|v| v * 3 + 1).collect()
}

/// 4x4 RGGB mosaic whose red sites alternate between black and near-white
/// codes. Every neighbour average is an exact integer.
fn checkerboard() -> RawArray<'static> {
    #[rustfmt::skip]
    let values: [u16; 16] = [
        64,   543, 1022, 543,
        543,  64,  543,  64,
        1022, 543, 64,   543,
        543,  64,  543,  64,
    ];
    filled(4, 4, 1, ColorLayout::Rggb, &values)
}

#[test]
fn test_remap_bggr_to_rggb() {
    // B G / G R
    let mut bayer = filled(2, 2, 1, ColorLayout::Bggr, &[1u16, 2, 3, 4]);
    bayer_to_bayer_rggb(&mut bayer).unwrap();

    assert_eq!(bayer.layout(), ColorLayout::Rggb);
    assert_eq!(samples::<u16>(&bayer), vec![4, 3, 2, 1]);
}

#[test]
fn test_remap_grbg_and_gbrg_to_rggb() {
    // G R / B G
    let mut grbg = filled(2, 2, 1, ColorLayout::Grbg, &[1u16, 2, 3, 4]);
    bayer_to_bayer_rggb(&mut grbg).unwrap();
    assert_eq!(samples::<u16>(&grbg), vec![2, 1, 4, 3]);

    // G B / R G
    let mut gbrg = filled(2, 2, 1, ColorLayout::Gbrg, &[1u16, 2, 3, 4]);
    bayer_to_bayer_rggb(&mut gbrg).unwrap();
    assert_eq!(samples::<u16>(&gbrg), vec![3, 4, 1, 2]);
}

#[test]
fn test_remap_places_red_at_origin_of_every_tile() {
    // Tag each site with its colour: 1=R, 2=G, 3=B
    for (layout, tile) in [
        (ColorLayout::Bggr, [3u8, 2, 2, 1]),
        (ColorLayout::Grbg, [2, 1, 3, 2]),
        (ColorLayout::Gbrg, [2, 3, 1, 2]),
    ] {
        let mut values = Vec::new();
        for y in 0..4 {
            for x in 0..6 {
                values.push(tile[(y % 2) * 2 + x % 2]);
            }
        }
        let mut bayer = filled(4, 6, 1, layout, &values);
        bayer_to_bayer_rggb(&mut bayer).unwrap();

        for y in 0..4 {
            for x in 0..6 {
                let expected = [1u8, 2, 2, 3][(y % 2) * 2 + x % 2];
                assert_eq!(bayer.get::<u8>(y, x, 0), expected, "{layout:?} at ({y}, {x})");
            }
        }
    }
}

#[test]
fn test_remap_is_idempotent() {
    let mut once = filled(4, 4, 1, ColorLayout::Gbrg, &ramp(16));
    bayer_to_bayer_rggb(&mut once).unwrap();
    let after_once = samples::<u16>(&once);

    bayer_to_bayer_rggb(&mut once).unwrap();
    assert_eq!(samples::<u16>(&once), after_once);
    assert_eq!(once.layout(), ColorLayout::Rggb);
}

#[test]
fn test_remap_rggb_is_noop() {
    let mut bayer = filled(2, 4, 1, ColorLayout::Rggb, &ramp(8));
    bayer_to_bayer_rggb(&mut bayer).unwrap();
    assert_eq!(samples::<u16>(&bayer), ramp(8));
}

#[test]
fn test_remap_rejects_rgb_odd_and_invalid_buffers() {
    let mut rgb = RawArray::allocate(2, 2, 3, ElementType::U16, ColorLayout::Rgb);
    assert!(matches!(bayer_to_bayer_rggb(&mut rgb), Err(ConversionError::PatternInvalid(_))));

    let mut odd = RawArray::allocate(3, 4, 1, ElementType::U16, ColorLayout::Grbg);
    assert!(matches!(bayer_to_bayer_rggb(&mut odd), Err(ConversionError::PatternInvalid(_))));

    let mut invalid = RawArray::allocate(usize::MAX, 4, 1, ElementType::U16, ColorLayout::Bggr);
    assert!(matches!(bayer_to_bayer_rggb(&mut invalid), Err(ConversionError::InvalidBuffer(_))));
}

#[test]
fn test_remap_honors_row_padding() {
    // 2x2 u16 mosaic, rows 8 bytes apart with 4 bytes of padding each
    let mut memory = vec![0xEEu8; 16];
    for (i, v) in [1u16, 2, 3, 4].into_iter().enumerate() {
        let offset = (i / 2) * 8 + (i % 2) * 2;
        memory[offset..offset + 2].copy_from_slice(&v.to_ne_bytes());
    }
    {
        let mut bayer = RawArray::wrap_strided(&mut memory, [2, 2, 1], [8, 2, 2], ElementType::U16, ColorLayout::Bggr);
        bayer_to_bayer_rggb(&mut bayer).unwrap();
        assert_eq!(samples::<u16>(&bayer), vec![4, 3, 2, 1]);
    }
    assert!(memory[4..8].iter().chain(&memory[12..16]).all(|&b| b == 0xEE));
}

#[test]
fn test_quadrant_split_and_pack_round_trip() {
    for (height, width) in [(2, 2), (4, 6), (6, 4), (8, 8)] {
        let original = filled(height, width, 1, ColorLayout::Rggb, &ramp(height * width));

        let mut planes = RawArray::allocate(height / 2, width / 2, 4, ElementType::U16, ColorLayout::Rggb);
        bayer_rggb_to_rggb(&original, &mut planes).unwrap();

        let mut packed = RawArray::allocate(height, width, 1, ElementType::U16, ColorLayout::Rggb);
        rggb_to_bayer_rggb(&planes, &mut packed).unwrap();

        assert_eq!(samples::<u16>(&packed), samples::<u16>(&original), "{height}x{width}");
    }
}

#[test]
fn test_quadrant_conversions_on_padded_buffers() {
    let values = ramp(4 * 6);
    let original = filled(4, 6, 1, ColorLayout::Rggb, &values);

    let mosaic_strides = padded_strides(6, 1, ElementType::U16, 2, 6);
    let plane_strides = padded_strides(3, 4, ElementType::U16, 4, 2);
    let mut mosaic_mem = vec![0xEEu8; backing_len([4, 6, 1], mosaic_strides)];
    let mut plane_mem = vec![0xEEu8; backing_len([2, 3, 4], plane_strides)];
    let mut packed_mem = vec![0xEEu8; backing_len([4, 6, 1], mosaic_strides)];
    {
        let mut mosaic =
            RawArray::wrap_strided(&mut mosaic_mem, [4, 6, 1], mosaic_strides, ElementType::U16, ColorLayout::Rggb);
        fill(&mut mosaic, &values);
        let mut planes =
            RawArray::wrap_strided(&mut plane_mem, [2, 3, 4], plane_strides, ElementType::U16, ColorLayout::Rggb);
        bayer_rggb_to_rggb(&mosaic, &mut planes).unwrap();

        let mut expected = RawArray::allocate(2, 3, 4, ElementType::U16, ColorLayout::Rggb);
        bayer_rggb_to_rggb(&original, &mut expected).unwrap();
        assert_eq!(samples::<u16>(&planes), samples::<u16>(&expected));

        let mut packed =
            RawArray::wrap_strided(&mut packed_mem, [4, 6, 1], mosaic_strides, ElementType::U16, ColorLayout::Rggb);
        rggb_to_bayer_rggb(&planes, &mut packed).unwrap();
        assert_eq!(samples::<u16>(&packed), values);
    }
    assert!(padding_untouched(&plane_mem, [2, 3, 4], plane_strides, 2, 0xEE));
    assert!(padding_untouched(&packed_mem, [4, 6, 1], mosaic_strides, 2, 0xEE));
}

#[test]
fn test_quadrant_split_channel_order() {
    // R G / G B repeated; second tile shifted by 10
    let mosaic = filled(2, 4, 1, ColorLayout::Rggb, &[1u16, 2, 11, 12, 3, 4, 13, 14]);
    let mut planes = RawArray::allocate(1, 2, 4, ElementType::U16, ColorLayout::Rggb);
    bayer_rggb_to_rggb(&mosaic, &mut planes).unwrap();

    assert_eq!(samples::<u16>(&planes), vec![1, 2, 3, 4, 11, 12, 13, 14]);

    // and back from planes first
    let mut packed = RawArray::allocate(2, 4, 1, ElementType::U16, ColorLayout::Rggb);
    rggb_to_bayer_rggb(&planes, &mut packed).unwrap();
    let mut planes_again = RawArray::allocate(1, 2, 4, ElementType::U16, ColorLayout::Rggb);
    bayer_rggb_to_rggb(&packed, &mut planes_again).unwrap();
    assert_eq!(samples::<u16>(&planes_again), samples::<u16>(&planes));
}

#[test]
fn test_quadrant_conversions_reject_bad_shapes() {
    let mosaic = filled(4, 4, 1, ColorLayout::Rggb, &ramp(16));
    let mut wrong = RawArray::allocate(4, 4, 4, ElementType::U16, ColorLayout::Rggb);
    assert!(matches!(bayer_rggb_to_rggb(&mosaic, &mut wrong), Err(ConversionError::ShapeMismatch(_))));

    let mut wrong_type = RawArray::allocate(2, 2, 4, ElementType::F32, ColorLayout::Rggb);
    assert!(matches!(bayer_rggb_to_rggb(&mosaic, &mut wrong_type), Err(ConversionError::ShapeMismatch(_))));

    let two_channel = RawArray::allocate(4, 4, 2, ElementType::U16, ColorLayout::Rggb);
    let mut planes = RawArray::allocate(2, 2, 4, ElementType::U16, ColorLayout::Rggb);
    assert!(matches!(bayer_rggb_to_rggb(&two_channel, &mut planes), Err(ConversionError::ShapeMismatch(_))));

    let odd = RawArray::allocate(3, 4, 1, ElementType::U16, ColorLayout::Rggb);
    let mut planes = RawArray::allocate(1, 2, 4, ElementType::U16, ColorLayout::Rggb);
    assert!(matches!(bayer_rggb_to_rggb(&odd, &mut planes), Err(ConversionError::PatternInvalid(_))));

    let planes = RawArray::allocate(2, 2, 4, ElementType::U16, ColorLayout::Rggb);
    let mut small = RawArray::allocate(2, 2, 1, ElementType::U16, ColorLayout::Rggb);
    assert!(matches!(rggb_to_bayer_rggb(&planes, &mut small), Err(ConversionError::ShapeMismatch(_))));
}

#[test]
fn test_demosaic_checkerboard() {
    let mosaic = checkerboard();
    let mut rgb = RawArray::allocate(4, 4, 3, ElementType::U16, ColorLayout::Rgb);
    bayer_rggb_to_rgb(&mosaic, &mut rgb).unwrap();

    let px = |y, x| [rgb.get::<u16>(y, x, 0), rgb.get::<u16>(y, x, 1), rgb.get::<u16>(y, x, 2)];
    // red site keeps its own sample, green from the cross, blue from diagonals
    assert_eq!(px(0, 0), [64, 543, 64]);
    assert_eq!(px(0, 2), [1022, 543, 64]);
    // green on a red row: red from left/right, blue from above/below
    assert_eq!(px(0, 1), [543, 543, 64]);
    assert_eq!(px(0, 3), [1022, 543, 64]);
    // green on a blue row: red from above/below
    assert_eq!(px(1, 0), [543, 543, 64]);
    assert_eq!(px(3, 2), [64, 543, 64]);
    // blue site: red from the four diagonals, mirrored at the border
    assert_eq!(px(1, 1), [543, 543, 64]);
    assert_eq!(px(3, 1), [543, 543, 64]);
    assert_eq!(px(3, 3), [64, 543, 64]);
}

#[test]
fn test_demosaic_uniform_field_is_flat() {
    let mosaic = filled(6, 8, 1, ColorLayout::Gbrg, &[100u8; 48]);
    let mut rgb = RawArray::allocate(6, 8, 3, ElementType::U8, ColorLayout::Rgb);
    bayer_rggb_to_rgb(&mosaic, &mut rgb).unwrap();
    assert!(samples::<u8>(&rgb).iter().all(|&v| v == 100));
}

#[test]
fn test_demosaic_reads_colour_from_pattern_tag() {
    // BGGR with blue=10, green=20, red=30 everywhere
    let mut values = Vec::new();
    for y in 0..4 {
        for x in 0..4 {
            values.push(match (y % 2, x % 2) {
                (0, 0) => 10.0f32,
                (1, 1) => 30.0,
                _ => 20.0,
            });
        }
    }
    let mosaic = filled(4, 4, 1, ColorLayout::Bggr, &values);
    let mut rgb = RawArray::allocate(4, 4, 3, ElementType::F32, ColorLayout::Rgb);
    bayer_rggb_to_rgb(&mosaic, &mut rgb).unwrap();

    for y in 0..4 {
        for x in 0..4 {
            assert_eq!([rgb.get::<f32>(y, x, 0), rgb.get(y, x, 1), rgb.get(y, x, 2)], [30.0, 20.0, 10.0]);
        }
    }
}

#[test]
fn test_demosaic_integer_and_float_paths_agree() {
    let mosaic = checkerboard();
    let as_float: Vec<f32> = samples::<u16>(&mosaic).into_iter().map(f32::from).collect();
    let float_mosaic = filled(4, 4, 1, ColorLayout::Rggb, &as_float);

    let mut rgb = RawArray::allocate(4, 4, 3, ElementType::U16, ColorLayout::Rgb);
    bayer_rggb_to_rgb(&mosaic, &mut rgb).unwrap();
    let mut rgb_f32 = RawArray::allocate(4, 4, 3, ElementType::F32, ColorLayout::Rgb);
    bayer_rggb_to_rgb(&float_mosaic, &mut rgb_f32).unwrap();

    let widened: Vec<f32> = samples::<u16>(&rgb).into_iter().map(f32::from).collect();
    assert_eq!(widened, samples::<f32>(&rgb_f32));
}

#[test]
fn test_demosaic_on_padded_buffers() {
    let mosaic = checkerboard();
    let values = samples::<u16>(&mosaic);
    let mut expected = RawArray::allocate(4, 4, 3, ElementType::U16, ColorLayout::Rgb);
    bayer_rggb_to_rgb(&mosaic, &mut expected).unwrap();

    let in_strides = padded_strides(4, 1, ElementType::U16, 2, 6);
    let out_strides = padded_strides(4, 3, ElementType::U16, 2, 4);
    let mut in_mem = vec![0xEEu8; backing_len([4, 4, 1], in_strides)];
    let mut out_mem = vec![0xEEu8; backing_len([4, 4, 3], out_strides)];
    {
        let mut input = RawArray::wrap_strided(&mut in_mem, [4, 4, 1], in_strides, ElementType::U16, ColorLayout::Rggb);
        fill(&mut input, &values);
        let mut output = RawArray::wrap_strided(&mut out_mem, [4, 4, 3], out_strides, ElementType::U16, ColorLayout::Rgb);
        bayer_rggb_to_rgb(&input, &mut output).unwrap();
        assert_eq!(samples::<u16>(&output), samples::<u16>(&expected));
    }
    assert!(padding_untouched(&out_mem, [4, 4, 3], out_strides, 2, 0xEE));
}

#[test]
fn test_demosaic_u8_on_padded_output() {
    let mosaic = filled(4, 4, 1, ColorLayout::Gbrg, &[100u8; 16]);
    let strides = padded_strides(4, 3, ElementType::U8, 1, 3);
    let mut memory = vec![0xEEu8; backing_len([4, 4, 3], strides)];
    {
        let mut rgb = RawArray::wrap_strided(&mut memory, [4, 4, 3], strides, ElementType::U8, ColorLayout::Rgb);
        bayer_rggb_to_rgb(&mosaic, &mut rgb).unwrap();
        assert!(samples::<u8>(&rgb).iter().all(|&v| v == 100));
    }
    assert!(padding_untouched(&memory, [4, 4, 3], strides, 1, 0xEE));
}

#[test]
fn test_demosaic_rejects_mismatches() {
    let mosaic = checkerboard();

    let mut mono = RawArray::allocate(4, 4, 1, ElementType::U16, ColorLayout::Rggb);
    assert!(matches!(bayer_rggb_to_rgb(&mosaic, &mut mono), Err(ConversionError::ShapeMismatch(_))));

    let mut wrong_type = RawArray::allocate(4, 4, 3, ElementType::U8, ColorLayout::Rgb);
    assert!(matches!(bayer_rggb_to_rgb(&mosaic, &mut wrong_type), Err(ConversionError::ShapeMismatch(_))));

    let mut wrong_size = RawArray::allocate(4, 2, 3, ElementType::U16, ColorLayout::Rgb);
    assert!(matches!(bayer_rggb_to_rgb(&mosaic, &mut wrong_size), Err(ConversionError::ShapeMismatch(_))));

    let rgb_input = RawArray::allocate(4, 4, 1, ElementType::U16, ColorLayout::Rgb);
    let mut rgb = RawArray::allocate(4, 4, 3, ElementType::U16, ColorLayout::Rgb);
    assert!(matches!(bayer_rggb_to_rgb(&rgb_input, &mut rgb), Err(ConversionError::PatternInvalid(_))));
}

#[test]
fn test_normalize_clamps_and_scales_to_u8() {
    let input = filled(1, 5, 1, ColorLayout::Rggb, &[0u16, 500, 1000, 1500, 4000]);
    let mut output = RawArray::allocate(1, 5, 1, ElementType::U8, ColorLayout::Rggb);
    normalize(&input, &mut output, 500.0, 1500.0).unwrap();

    let out = samples::<u8>(&output);
    assert_eq!(out[0], 0);
    assert_eq!(out[1], 0);
    assert!((127..=128).contains(&out[2]), "midpoint mapped to {}", out[2]);
    assert_eq!(out[3], 255);
    assert_eq!(out[4], 255);
}

#[test]
fn test_normalize_to_u16_and_f32_ranges() {
    let input = filled(1, 3, 1, ColorLayout::Rggb, &[-1.0f32, 0.5, 2.0]);

    let mut wide = RawArray::allocate(1, 3, 1, ElementType::U16, ColorLayout::Rggb);
    normalize(&input, &mut wide, 0.0, 1.0).unwrap();
    let out = samples::<u16>(&wide);
    assert_eq!(out[0], 0);
    assert!(out[1].abs_diff(32768) <= 1);
    assert_eq!(out[2], 65535);

    let mut unit = RawArray::allocate(1, 3, 1, ElementType::F32, ColorLayout::Rggb);
    normalize(&input, &mut unit, 0.0, 1.0).unwrap();
    assert_eq!(samples::<f32>(&unit), vec![0.0, 0.5, 1.0]);
}

#[test]
fn test_normalize_rejects_empty_or_inverted_range() {
    let input = filled(1, 2, 1, ColorLayout::Rggb, &[1u16, 2]);
    let mut output = RawArray::allocate(1, 2, 1, ElementType::F32, ColorLayout::Rggb);

    for (min, max) in [(64.0, 64.0), (10.0, 5.0), (f32::NAN, 1.0)] {
        assert!(matches!(
            normalize(&input, &mut output, min, max),
            Err(ConversionError::RangeInvalid { .. })
        ));
    }
}

#[test]
fn test_normalize_failure_leaves_output_memory_in_bounds() {
    let input = filled(2, 2, 3, ColorLayout::Rgb, &[0.5f32; 12]);
    let mut memory = vec![0x5Au8; 2 * 2 * 3 + 8];
    {
        let mut output = RawArray::wrap(&mut memory[..12], 2, 2, 3, ElementType::U8, ColorLayout::Rgb);
        let result = normalize(&input, &mut output, 1.0, 1.0);
        assert!(matches!(result, Err(ConversionError::RangeInvalid { .. })));
    }
    assert!(memory[12..].iter().all(|&b| b == 0x5A));
}

#[test]
fn test_normalize_into_padded_u8_destination() {
    let values = [0.0f32, 0.25, 0.5, 0.75, 1.0, 1.5, -0.5, 0.1, 0.9, 0.2, 0.4, 0.6];
    let input = filled(2, 2, 3, ColorLayout::Rgb, &values);
    let mut expected = RawArray::allocate(2, 2, 3, ElementType::U8, ColorLayout::Rgb);
    normalize(&input, &mut expected, 0.0, 1.0).unwrap();

    let strides = padded_strides(2, 3, ElementType::U8, 1, 5);
    let mut memory = vec![0xEEu8; backing_len([2, 2, 3], strides)];
    {
        let mut output = RawArray::wrap_strided(&mut memory, [2, 2, 3], strides, ElementType::U8, ColorLayout::Rgb);
        normalize(&input, &mut output, 0.0, 1.0).unwrap();
        assert_eq!(samples::<u8>(&output), samples::<u8>(&expected));
    }
    assert!(padding_untouched(&memory, [2, 2, 3], strides, 1, 0xEE));
}

#[test]
fn test_normalize_rejects_dimension_mismatch() {
    let input = RawArray::allocate(2, 2, 3, ElementType::U16, ColorLayout::Rgb);
    let mut output = RawArray::allocate(2, 2, 1, ElementType::F32, ColorLayout::Rgb);
    assert!(matches!(normalize(&input, &mut output, 0.0, 1.0), Err(ConversionError::ShapeMismatch(_))));
}

#[test]
fn test_identity_ccm_and_unit_gain_leave_pixels_unchanged() {
    let values = [0.1f32, 0.2, 0.3, 0.9, 0.0, 1.5, 0.25, 0.5, 0.75, 1.0, 1.0, 1.0];
    let mut rgb = filled(2, 2, 3, ColorLayout::Rgb, &values);

    apply_ccm(&mut rgb, &[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
    assert_eq!(samples::<f32>(&rgb), values.to_vec());

    apply_rgb_gain(&mut rgb, &[1.0, 1.0, 1.0]).unwrap();
    assert_eq!(samples::<f32>(&rgb), values.to_vec());
}

#[test]
fn test_ccm_mixes_channels_without_clamping() {
    let mut rgb = filled(1, 1, 3, ColorLayout::Rgb, &[0.25f32, 0.5, 0.75]);
    // swap R and B, double G
    apply_ccm(&mut rgb, &[0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 1.0, 0.0, 0.0]).unwrap();
    assert_eq!(samples::<f32>(&rgb), vec![0.75, 1.0, 0.25]);

    apply_ccm(&mut rgb, &[2.0, 0.0, 0.0, 0.0, 2.0, 0.0, -1.0, 0.0, 0.0]).unwrap();
    assert_eq!(samples::<f32>(&rgb), vec![1.5, 2.0, -0.75]);
}

#[test]
fn test_rgb_gain_scales_each_channel() {
    let mut rgb = filled(1, 2, 3, ColorLayout::Rgb, &[0.5f32, 0.5, 0.5, 0.25, 0.25, 0.25]);
    apply_rgb_gain(&mut rgb, &[2.0, 1.0, 0.5]).unwrap();
    assert_eq!(samples::<f32>(&rgb), vec![1.0, 0.5, 0.25, 0.5, 0.25, 0.125]);
}

#[test]
fn test_color_ops_require_rgb_f32() {
    let mut rgb_u16 = RawArray::allocate(2, 2, 3, ElementType::U16, ColorLayout::Rgb);
    assert!(matches!(apply_ccm(&mut rgb_u16, &[0.0; 9]), Err(ConversionError::ShapeMismatch(_))));
    assert!(matches!(apply_rgb_gain(&mut rgb_u16, &[1.0; 3]), Err(ConversionError::ShapeMismatch(_))));

    let mut bayer = RawArray::allocate(2, 2, 1, ElementType::F32, ColorLayout::Rggb);
    assert!(matches!(apply_ccm(&mut bayer, &[0.0; 9]), Err(ConversionError::PatternInvalid(_))));

    let mut four = RawArray::allocate(2, 2, 4, ElementType::F32, ColorLayout::Rgb);
    assert!(matches!(apply_rgb_gain(&mut four, &[1.0; 3]), Err(ConversionError::ShapeMismatch(_))));
}

#[test]
fn test_rgb_gain_rejects_negative_gain() {
    let mut rgb = RawArray::allocate(1, 1, 3, ElementType::F32, ColorLayout::Rgb);
    assert!(matches!(
        apply_rgb_gain(&mut rgb, &[1.0, -0.5, 1.0]),
        Err(ConversionError::InvalidParameter(_))
    ));
}

#[test]
fn test_color_ops_on_padded_buffer() {
    let values = [0.25f32, 0.5, 0.75, 0.1, 0.2, 0.4, 1.0, 0.0, 0.5, 0.3, 0.6, 0.9];
    let ccm = [0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 1.0, 0.0, 0.0];
    let gain = [2.0, 1.0, 0.5];

    let mut expected = filled(2, 2, 3, ColorLayout::Rgb, &values);
    apply_ccm(&mut expected, &ccm).unwrap();
    apply_rgb_gain(&mut expected, &gain).unwrap();

    let strides = padded_strides(2, 3, ElementType::F32, 4, 8);
    let mut memory = vec![0xEEu8; backing_len([2, 2, 3], strides)];
    {
        let mut rgb = RawArray::wrap_strided(&mut memory, [2, 2, 3], strides, ElementType::F32, ColorLayout::Rgb);
        fill(&mut rgb, &values);
        apply_ccm(&mut rgb, &ccm).unwrap();
        apply_rgb_gain(&mut rgb, &gain).unwrap();
        assert_eq!(samples::<f32>(&rgb), samples::<f32>(&expected));
    }
    assert!(padding_untouched(&memory, [2, 2, 3], strides, 4, 0xEE));
}
