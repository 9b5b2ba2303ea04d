use std::time::Instant;
use crate::data::{TimeCalc, X};
use crate::utils;

pub trait InferenceProcess {
    type Input; // PixelImage
    type Output;

    /// Pre-process the input data.
    fn preprocess(&self, x: &Self::Input) -> anyhow::Result<X>;

    /// Executes the model on the preprocessed data.
    fn inference(&mut self, x: X) -> anyhow::Result<X>;

    /// Post-process the model's output.
    fn postprocess(&self, y: X) -> anyhow::Result<Self::Output>;

    /// Stage timings collected by [`InferenceProcess::forward`].
    fn timings(&mut self) -> &mut TimeCalc;

    /// Executes the full pipeline.
    fn run(&mut self, x: &Self::Input) -> anyhow::Result<Self::Output> {
        let y = self.preprocess(x)?;
        let y = self.inference(y)?;
        let y = self.postprocess(y)?;
        Ok(y)
    }

    /// Executes the full pipeline, timing each stage.
    fn forward(&mut self, x: &Self::Input, profile: bool) -> anyhow::Result<Self::Output> {
        let classify_time = Instant::now();
        let mut _classify_elapsed = classify_time.elapsed();

        let t_pre = Instant::now();
        let y = self.preprocess(x)?;
        let t_pre = t_pre.elapsed();
        _classify_elapsed = utils::trace(profile, "TIME", "Preprocessing input", classify_time, _classify_elapsed);

        let t_exe = Instant::now();
        let y = self.inference(y)?;
        let t_exe = t_exe.elapsed();
        _classify_elapsed = utils::trace(profile, "TIME", "Classification run", classify_time, _classify_elapsed);

        let t_post = Instant::now();
        let y = self.postprocess(y)?;
        let t_post = t_post.elapsed();
        _classify_elapsed = utils::trace(profile, "TIME", "Postprocessing", classify_time, _classify_elapsed);

        let ts = self.timings();
        ts.add_or_push(0, t_pre);
        ts.add_or_push(1, t_exe);
        ts.add_or_push(2, t_post);

        if profile {
            let len = 10usize;
            let n = 4usize;
            log::info!(
                "[Profile] {:>len$.n$?} ({:>len$.n$?} avg) [preprocess: {:>len$.n$?} ({:>len$.n$?} avg) | inference: {:>len$.n$?} ({:>len$.n$?} avg) | postprocess: {:>len$.n$?} ({:>len$.n$?} avg)]",
                t_pre + t_exe + t_post,
                ts.avg(),
                t_pre,
                ts.avg_i(0),
                t_exe,
                ts.avg_i(1),
                t_post,
                ts.avg_i(2),
            );
        }

        Ok(y)
    }
}
