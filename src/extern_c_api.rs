pub mod ffi {
    use std::ffi::{c_char, c_int, CStr, CString};
    use std::{ptr, slice};
    use crate::classifier::Classifier;
    use crate::common::{ClassificationResult, ModelConfig, PixelImage};

    #[repr(C)]
    pub struct BvrClassificationFfi {
        /// -1 for error placeholders.
        pub class_id: i32,
        pub label: *mut c_char,
        pub confidence: f32,
        pub is_sentinel: bool,
    }

    fn to_ffi_classification(result: ClassificationResult) -> BvrClassificationFfi {
        let is_sentinel = result.is_sentinel();
        let class_id = result.class_id.and_then(|id| i32::try_from(id).ok()).unwrap_or(-1);
        // interior NULs would truncate the label on the C side
        let label = CString::new(result.label.replace('\0', " ")).unwrap_or_default();

        BvrClassificationFfi {
            class_id,
            label: label.into_raw(),
            confidence: result.confidence,
            is_sentinel,
        }
    }

    unsafe fn opt_str(s: *const c_char) -> Option<String> {
        if s.is_null() {
            return None;
        }
        match CStr::from_ptr(s).to_str() {
            Ok(s) if !s.is_empty() => Some(s.to_string()),
            Ok(_) => None,
            Err(e) => {
                log::warn!("Ignoring non UTF-8 path: {e}");
                None
            }
        }
    }

    /// Creates a classifier. Never returns null; a load failure yields a degraded classifier.
    ///
    /// # Safety
    /// Both arguments must be null or valid NUL-terminated strings.
    #[no_mangle]
    pub unsafe extern "C" fn bvr_classifier_new(asset_dir: *const c_char, ort_lib_path: *const c_char) -> *mut Classifier {
        let config = ModelConfig::new(opt_str(asset_dir), opt_str(ort_lib_path).unwrap_or_default());
        Box::into_raw(Box::new(Classifier::from_config(&config)))
    }

    /// Classifies a packed RGB8 buffer of `width * height * 3` bytes.
    ///
    /// Writes an array of at least one result to `out_results` and its length to `out_len`;
    /// release it with [`bvr_results_free`]. Returns 0 on success and -1 if a pointer argument is null.
    ///
    /// # Safety
    /// `handle` must come from [`bvr_classifier_new`] and not be used concurrently.
    /// `rgb` must be null or point to `width * height * 3` readable bytes.
    #[no_mangle]
    pub unsafe extern "C" fn bvr_classifier_classify(
        handle: *mut Classifier,
        rgb: *const u8,
        width: c_int,
        height: c_int,
        out_results: *mut *mut BvrClassificationFfi,
        out_len: *mut usize,
    ) -> c_int {
        if handle.is_null() || out_results.is_null() || out_len.is_null() {
            return -1;
        }
        let classifier = &mut *handle;

        let image = match (u32::try_from(width), u32::try_from(height)) {
            (Ok(w), Ok(h)) if !rgb.is_null() => {
                let len = w as usize * h as usize * 3;
                let bytes = slice::from_raw_parts(rgb, len).to_vec();
                PixelImage::from_rgb_bytes(w, h, bytes).unwrap_or_else(|e| {
                    log::warn!("Bad RGB buffer: {e:#}");
                    PixelImage::default()
                })
            }
            _ => {
                log::warn!("Invalid image passed over FFI ({}x{}, null={})", width, height, rgb.is_null());
                PixelImage::default()
            }
        };

        let results: Box<[BvrClassificationFfi]> = classifier
            .classify(&image)
            .into_iter()
            .map(to_ffi_classification)
            .collect();

        *out_len = results.len();
        *out_results = Box::into_raw(results) as *mut BvrClassificationFfi;
        0
    }

    /// # Safety
    /// `results` and `len` must come from one [`bvr_classifier_classify`] call, freed once.
    #[no_mangle]
    pub unsafe extern "C" fn bvr_results_free(results: *mut BvrClassificationFfi, len: usize) {
        if results.is_null() {
            return;
        }
        let results = Box::from_raw(ptr::slice_from_raw_parts_mut(results, len));
        for r in results.iter() {
            if !r.label.is_null() {
                drop(CString::from_raw(r.label));
            }
        }
    }

    /// Releases the model. The handle stays valid and answers with sentinels.
    ///
    /// # Safety
    /// `handle` must be null or come from [`bvr_classifier_new`].
    #[no_mangle]
    pub unsafe extern "C" fn bvr_classifier_close(handle: *mut Classifier) {
        if let Some(classifier) = handle.as_mut() {
            classifier.close();
        }
    }

    /// # Safety
    /// `handle` must be null or come from [`bvr_classifier_new`], and is invalid afterwards.
    #[no_mangle]
    pub unsafe extern "C" fn bvr_classifier_free(handle: *mut Classifier) {
        if !handle.is_null() {
            let mut classifier = Box::from_raw(handle);
            classifier.close();
        }
    }

}
