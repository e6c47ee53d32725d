// src/fbdev/tests.rs

use super::*;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;
use test_log::test;

const UNTOUCHED: Pixel = 0xDEAD_BEEF;

fn var_info(xres: u32, yres: u32, bits_per_pixel: u32) -> FbVarScreenInfo {
    FbVarScreenInfo {
        xres,
        yres,
        xres_virtual: xres,
        yres_virtual: yres * 2,
        bits_per_pixel,
        ..Default::default()
    }
}

fn numbered_pixels(count: usize) -> Vec<Pixel> {
    (0..count as u32).map(|i| 0x0100_0000 | i).collect()
}

#[test]
fn geometry_for_800x480_matches_expected_sizes() {
    let geometry = Geometry::from_screen_info(&var_info(800, 480, 32), None).unwrap();
    assert_eq!(geometry.stride_px, 800);
    assert_eq!(geometry.yres_virtual, 960);
    assert_eq!(geometry.screen_size_bytes(), 1_536_000);
}

#[test]
fn non_32bpp_modes_are_rejected() {
    for bpp in [16, 24] {
        match Geometry::from_screen_info(&var_info(800, 480, bpp), None) {
            Err(SurfaceError::UnsupportedFormat { bits_per_pixel }) => {
                assert_eq!(bits_per_pixel, bpp)
            }
            other => panic!("expected UnsupportedFormat for {} bpp, got {:?}", bpp, other),
        }
    }
}

#[test]
fn line_length_widens_stride_only_when_it_covers_a_row() {
    let info = var_info(800, 480, 32);
    let padded = Geometry::from_screen_info(&info, Some(832 * 4)).unwrap();
    assert_eq!(padded.stride_px, 832);
    assert_eq!(padded.screen_size_bytes(), 832 * 480 * 4);

    let too_short = Geometry::from_screen_info(&info, Some(100)).unwrap();
    assert_eq!(too_short.stride_px, 800);
    let zero = Geometry::from_screen_info(&info, Some(0)).unwrap();
    assert_eq!(zero.stride_px, 800);
}

#[test]
fn opening_missing_device_reports_unavailable() {
    let err = FramebufferSurface::open(Path::new("/nonexistent/fb-device")).unwrap_err();
    assert!(
        matches!(err, SurfaceError::DeviceUnavailable { .. }),
        "got {:?}",
        err
    );
}

#[test]
fn opening_regular_file_reports_query_failure() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let err = FramebufferSurface::open(file.path()).unwrap_err();
    assert!(
        matches!(err, SurfaceError::QueryFailed { .. }),
        "got {:?}",
        err
    );
}

#[test]
fn mapping_zero_sized_geometry_fails() {
    let file = tempfile::tempfile().unwrap();
    let err = FramebufferSurface::map(file, Geometry::packed(0, 0)).unwrap_err();
    assert!(matches!(err, SurfaceError::MapFailed { len: 0, .. }));
}

#[test]
fn full_blit_reproduces_source_exactly() {
    let geometry = Geometry::packed(16, 9);
    let mut surface = MemorySurface::filled(geometry, UNTOUCHED);
    let src = numbered_pixels(16 * 9);
    surface.blit_region(geometry.bounds(), &src).unwrap();
    assert_eq!(surface.pixels(), &src[..]);
}

#[test]
fn sub_region_blit_leaves_other_pixels_untouched() {
    let geometry = Geometry {
        stride_px: 12,
        ..Geometry::packed(10, 6)
    };
    let mut surface = MemorySurface::filled(geometry, UNTOUCHED);
    let area = Area::new(3, 2, 4, 3);
    let src = numbered_pixels(area.pixel_count());
    surface.blit_region(area, &src).unwrap();

    for y in 0..6u32 {
        for x in 0..12u32 {
            let got = surface.pixels()[(y * 12 + x) as usize];
            let inside = (3..7).contains(&x) && (2..5).contains(&y);
            if inside {
                assert_eq!(got, src[((y - 2) * 4 + (x - 3)) as usize], "({}, {})", x, y);
            } else {
                assert_eq!(got, UNTOUCHED, "({}, {}) was overwritten", x, y);
            }
        }
    }
}

#[test]
fn out_of_bounds_regions_are_rejected_without_writing() {
    let geometry = Geometry::packed(8, 8);
    let mut surface = MemorySurface::filled(geometry, UNTOUCHED);
    let src = numbered_pixels(64);

    for area in [
        Area::new(5, 0, 4, 1),
        Area::new(0, 7, 1, 2),
        Area::new(u32::MAX, 0, 2, 1),
    ] {
        let err = surface.blit_region(area, &src).unwrap_err();
        assert!(
            matches!(err, SurfaceError::RegionOutOfBounds { .. }),
            "{:?} -> {:?}",
            area,
            err
        );
    }
    assert!(surface.pixels().iter().all(|&p| p == UNTOUCHED));
    assert_eq!(surface.blit_count(), 0);
}

#[test]
fn short_source_is_rejected() {
    let mut surface = MemorySurface::new(Geometry::packed(8, 8));
    let err = surface
        .blit_region(Area::new(0, 0, 4, 4), &numbered_pixels(15))
        .unwrap_err();
    assert!(matches!(
        err,
        SurfaceError::SourceTooShort {
            needed: 16,
            actual: 15
        }
    ));
}

#[test]
fn empty_region_is_a_no_op() {
    let geometry = Geometry::packed(4, 4);
    let mut surface = MemorySurface::filled(geometry, UNTOUCHED);
    surface.blit_region(Area::new(4, 4, 0, 0), &[]).unwrap();
    assert!(surface.pixels().iter().all(|&p| p == UNTOUCHED));
}

#[test]
fn mapped_surface_writes_through_to_backing_file() {
    let geometry = Geometry::packed(6, 4);
    let mut backing = tempfile::tempfile().unwrap();
    backing.set_len(geometry.screen_size_bytes() as u64).unwrap();

    let mut surface = FramebufferSurface::map(backing.try_clone().unwrap(), geometry).unwrap();
    let area = Area::new(1, 1, 3, 2);
    let src = numbered_pixels(area.pixel_count());
    surface.blit_region(area, &src).unwrap();
    assert_eq!(surface.pixels()[6 + 1], src[0]);
    drop(surface);

    let mut bytes = Vec::new();
    backing.seek(SeekFrom::Start(0)).unwrap();
    backing.read_to_end(&mut bytes).unwrap();
    let pixels: Vec<Pixel> = bytes
        .chunks_exact(BYTES_PER_PIXEL)
        .map(|b| Pixel::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        .collect();

    let mut expected = vec![0; 24];
    for row in 0..2 {
        for col in 0..3 {
            expected[(1 + row) * 6 + 1 + col] = src[row * 3 + col];
        }
    }
    assert_eq!(pixels, expected);
}

mod properties {
    use super::super::*;
    use proptest::prelude::*;

    fn geometry_and_area() -> impl Strategy<Value = (Geometry, Area)> {
        (1u32..40, 1u32..40, 0u32..6).prop_flat_map(|(w, h, pad)| {
            let geometry = Geometry {
                stride_px: w + pad,
                ..Geometry::packed(w, h)
            };
            (0..w, 0..h).prop_flat_map(move |(x, y)| {
                (1..=w - x, 1..=h - y)
                    .prop_map(move |(aw, ah)| (geometry, Area::new(x, y, aw, ah)))
            })
        })
    }

    proptest! {
        #[test]
        fn blit_changes_exactly_the_addressed_rectangle((geometry, area) in geometry_and_area()) {
            let mut surface = MemorySurface::filled(geometry, 0xFFFF_FFFF);
            let src: Vec<Pixel> = (0..area.pixel_count() as u32).collect();
            surface.blit_region(area, &src).unwrap();

            let stride = geometry.stride_px;
            for y in 0..geometry.yres {
                for x in 0..stride {
                    let got = surface.pixels()[(y * stride + x) as usize];
                    let inside = x >= area.x && (x as u64) < area.right()
                        && y >= area.y && (y as u64) < area.bottom();
                    if inside {
                        let idx = (y - area.y) * area.width + (x - area.x);
                        prop_assert_eq!(got, src[idx as usize]);
                    } else {
                        prop_assert_eq!(got, 0xFFFF_FFFF);
                    }
                }
            }
        }
    }
}
