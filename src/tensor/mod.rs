//! Tensor views over detector outputs.
//!
//! `TensorView` is a borrowed, row-major view of a `[1, grid, grid, channels]`
//! grid output. The shape is validated once when the view is built, so the
//! decoder can hand out per-cell channel slices without further checks.
//! `RowTensorView` is the equivalent for pre-decoded `[1, rows, channels]`
//! outputs.

use crate::util::{GridDetError, GridDetResult};

/// Channel layout of one grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridLayout {
    /// Cells per side of the square output grid.
    pub grid_size: usize,
    /// Box slots predicted by each cell.
    pub boxes_per_cell: usize,
    /// Length of the shared class-probability block.
    pub num_classes: usize,
}

/// Number of channels per box slot: `tx, ty, tw, th, objectness`.
pub const BOX_CHANNELS: usize = 5;

impl GridLayout {
    /// Returns the channel count `boxes_per_cell * 5 + num_classes`.
    ///
    /// The layout must fit in `usize`; see [`checked_len`](Self::checked_len).
    pub fn channels(&self) -> usize {
        self.boxes_per_cell * BOX_CHANNELS + self.num_classes
    }

    /// Returns the expected logical shape `[1, grid, grid, channels]`.
    pub fn shape(&self) -> [usize; 4] {
        [1, self.grid_size, self.grid_size, self.channels()]
    }

    /// Returns the channel count, or `None` if it overflows `usize`.
    pub fn checked_channels(&self) -> Option<usize> {
        self.boxes_per_cell
            .checked_mul(BOX_CHANNELS)?
            .checked_add(self.num_classes)
    }

    /// Returns the element count `grid * grid * channels`, or `None` on overflow.
    pub fn checked_len(&self) -> Option<usize> {
        self.grid_size
            .checked_mul(self.grid_size)?
            .checked_mul(self.checked_channels()?)
    }

    /// Offset of the class-probability block inside a cell.
    pub(crate) fn class_offset(&self) -> usize {
        self.boxes_per_cell * BOX_CHANNELS
    }
}

/// Borrowed `[1, grid, grid, channels]` view with a validated shape.
#[derive(Copy, Clone, Debug)]
pub struct TensorView<'a> {
    data: &'a [f32],
    layout: GridLayout,
}

impl<'a> TensorView<'a> {
    /// Creates a view after checking `shape` against `layout` and the data length.
    pub fn new(data: &'a [f32], shape: &[usize], layout: GridLayout) -> GridDetResult<Self> {
        check_layout(layout)?;
        let expected = layout.shape();
        check_rank(shape, expected.len())?;
        let dims: [&'static str; 4] = ["batch", "height", "width", "channels"];
        for ((&dim, &want), &got) in dims.iter().zip(expected.iter()).zip(shape.iter()) {
            if want != got {
                return Err(GridDetError::ShapeMismatch {
                    dim,
                    expected: want,
                    got,
                });
            }
        }
        check_len(data, &expected)?;
        Ok(Self { data, layout })
    }

    /// Creates a view of a buffer that is assumed to carry `layout.shape()`.
    ///
    /// Rejects zero or overflowing layout dimensions, then checks the data length.
    pub fn from_slice(data: &'a [f32], layout: GridLayout) -> GridDetResult<Self> {
        check_layout(layout)?;
        Self::new(data, &layout.shape(), layout)
    }

    /// Returns the layout the view was validated against.
    pub fn layout(&self) -> GridLayout {
        self.layout
    }

    /// Returns the logical shape `[1, grid, grid, channels]`.
    pub fn shape(&self) -> [usize; 4] {
        self.layout.shape()
    }

    /// Returns the backing slice.
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// Returns the channel slice of cell `(cy, cx)` if it is within the grid.
    pub fn cell(&self, cy: usize, cx: usize) -> Option<&'a [f32]> {
        let grid = self.layout.grid_size;
        if cy >= grid || cx >= grid {
            return None;
        }
        let channels = self.layout.channels();
        let start = (cy * grid + cx) * channels;
        self.data.get(start..start + channels)
    }

    /// Iterates cells in scan order (`cy` outer, `cx` inner).
    pub(crate) fn cells(&self) -> impl Iterator<Item = (usize, usize, &'a [f32])> + 'a {
        let grid = self.layout.grid_size;
        let data = self.data;
        data.chunks_exact(self.layout.channels())
            .enumerate()
            .map(move |(idx, cell)| (idx / grid, idx % grid, cell))
    }
}

/// Borrowed `[1, rows, 5 + num_classes]` view of a pre-decoded output.
#[derive(Copy, Clone, Debug)]
pub struct RowTensorView<'a> {
    data: &'a [f32],
    rows: usize,
    num_classes: usize,
}

impl<'a> RowTensorView<'a> {
    /// Creates a view after checking the shape against `num_classes`.
    pub fn new(data: &'a [f32], shape: &[usize], num_classes: usize) -> GridDetResult<Self> {
        if num_classes == 0 {
            return Err(GridDetError::InvalidConfig {
                reason: "num_classes must be > 0",
            });
        }
        check_rank(shape, 3)?;
        if shape[0] != 1 {
            return Err(GridDetError::ShapeMismatch {
                dim: "batch",
                expected: 1,
                got: shape[0],
            });
        }
        let channels =
            BOX_CHANNELS
                .checked_add(num_classes)
                .ok_or(GridDetError::InvalidConfig {
                    reason: "num_classes overflows the row width",
                })?;
        if shape[2] != channels {
            return Err(GridDetError::ShapeMismatch {
                dim: "channels",
                expected: channels,
                got: shape[2],
            });
        }
        check_len(data, shape)?;
        Ok(Self {
            data,
            rows: shape[1],
            num_classes,
        })
    }

    /// Returns the number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Returns row `idx` if it exists.
    pub fn row(&self, idx: usize) -> Option<&'a [f32]> {
        if idx >= self.rows {
            return None;
        }
        let channels = BOX_CHANNELS + self.num_classes;
        self.data.get(idx * channels..(idx + 1) * channels)
    }

    pub(crate) fn iter_rows(&self) -> impl Iterator<Item = &'a [f32]> + 'a {
        self.data.chunks_exact(BOX_CHANNELS + self.num_classes)
    }
}

/// Owned tensor buffer with its logical shape.
#[derive(Clone, Debug, PartialEq)]
pub struct OwnedTensor {
    data: Vec<f32>,
    shape: Vec<usize>,
}

impl OwnedTensor {
    /// Wraps a buffer whose length must equal the product of `shape`.
    pub fn new(data: Vec<f32>, shape: Vec<usize>) -> GridDetResult<Self> {
        check_len(&data, &shape)?;
        Ok(Self { data, shape })
    }

    /// Allocates a zero-filled tensor for a grid layout.
    ///
    /// `layout` is expected to come from a validated configuration.
    pub fn zeros(layout: GridLayout) -> Self {
        let shape = layout.shape().to_vec();
        let len = shape.iter().product();
        Self {
            data: vec![0.0; len],
            shape,
        }
    }

    /// Returns the logical shape.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the backing buffer.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Returns the backing buffer mutably.
    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Returns a grid view validated against `layout`.
    pub fn grid_view(&self, layout: GridLayout) -> GridDetResult<TensorView<'_>> {
        TensorView::new(&self.data, &self.shape, layout)
    }

    /// Returns a row view validated against `num_classes`.
    pub fn row_view(&self, num_classes: usize) -> GridDetResult<RowTensorView<'_>> {
        RowTensorView::new(&self.data, &self.shape, num_classes)
    }
}

fn check_layout(layout: GridLayout) -> GridDetResult<()> {
    if layout.grid_size == 0 || layout.boxes_per_cell == 0 || layout.num_classes == 0 {
        return Err(GridDetError::InvalidConfig {
            reason: "grid layout dimensions must be > 0",
        });
    }
    if layout.checked_len().is_none() {
        return Err(GridDetError::InvalidConfig {
            reason: "grid layout size overflows usize",
        });
    }
    Ok(())
}

fn check_rank(shape: &[usize], rank: usize) -> GridDetResult<()> {
    if shape.len() != rank {
        return Err(GridDetError::ShapeMismatch {
            dim: "rank",
            expected: rank,
            got: shape.len(),
        });
    }
    Ok(())
}

fn check_len(data: &[f32], shape: &[usize]) -> GridDetResult<()> {
    let needed = shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or(GridDetError::ShapeMismatch {
            dim: "data length",
            expected: usize::MAX,
            got: data.len(),
        })?;
    if data.len() != needed {
        return Err(GridDetError::ShapeMismatch {
            dim: "data length",
            expected: needed,
            got: data.len(),
        });
    }
    Ok(())
}
