use ima_adpcm::{decode, decode_block, interleave, output_len, AdpcmError, BlockLayout, Decoder, DecoderOptions};

// xorshift32, enough to exercise every nibble code
fn noise(mut state: u32) -> impl Iterator<Item = u8> {
    std::iter::repeat_with(move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state as u8
    })
}

fn stream(channel_count: usize, block_size: usize, block_count: usize) -> Vec<u8> {
    let mut body = noise(0x1234_5678);
    let mut result = Vec::with_capacity(block_size * block_count);

    for block in 0..block_count {
        for channel in 0..channel_count {
            let predictor = ((block * 7919 + channel * 104_729) % 65536) as u16 as i16;
            result.extend(predictor.to_le_bytes());
            result.push(((block + channel * 13) % 89) as u8);
            result.push(0);
        }
        result.extend(body.by_ref().take(block_size - channel_count * 4));
    }

    result
}

#[test]
fn test_parallel_equivalence() -> anyhow::Result<()> {
    let raw = stream(2, 2048, 37);
    let sequential = decode(&raw, 2, 2048, Some(1))?;

    for workers in [2, 3, 4, 7] {
        assert_eq!(decode(&raw, 2, 2048, Some(workers))?, sequential, "{} workers", workers);
    }

    Ok(())
}

#[test]
fn test_decode_is_deterministic() -> anyhow::Result<()> {
    let raw = stream(1, 1024, 64);
    let decoder = Decoder::new(DecoderOptions { workers: 4 })?;

    let first = decoder.decode(&raw, 1, 1024)?;
    for _ in 0..3 {
        let again = decoder.decode(&raw, 1, 1024)?;
        assert!(first[0].iter().zip(&again[0]).all(|(a, b)| a.to_bits() == b.to_bits()));
    }

    Ok(())
}

#[test]
fn test_block_independence() -> anyhow::Result<()> {
    let (channel_count, block_size) = (2, 256);
    let raw = stream(channel_count, block_size, 12);
    let full = decode(&raw, channel_count, block_size, Some(3))?;
    let stride = BlockLayout::new(channel_count, block_size)?.samples_per_block();

    for index in [0, 5, 11] {
        let block = &raw[index * block_size..(index + 1) * block_size];
        let mut alone = vec![vec![0.0f32; stride]; channel_count];

        decode_block(block, channel_count, &mut alone, 0)?;

        for channel in 0..channel_count {
            assert_eq!(alone[channel][..], full[channel][index * stride..(index + 1) * stride]);
        }
    }

    Ok(())
}

#[test]
fn test_sequential_blocks_chain_offsets() -> anyhow::Result<()> {
    let raw = stream(1, 36, 10);
    let mut outputs = [vec![0.0f32; output_len(raw.len(), 1)]];

    let mut offset = 0;
    for block in raw.chunks_exact(36) {
        offset = decode_block(block, 1, &mut outputs, offset)?;
    }

    assert_eq!(offset, 10 * 65);
    assert_eq!(outputs[0], decode(&raw, 1, 36, Some(4))?[0]);

    Ok(())
}

#[test]
fn test_header_only_blocks() -> anyhow::Result<()> {
    let raw = [0x10, 0x00, 0x05, 0x00, 0x20, 0x00, 0x03, 0x00];

    let outputs = decode(&raw, 2, 8, None)?;

    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0][0], 16.0 / 32767.0);
    assert_eq!(outputs[1][0], 32.0 / 32767.0);
    assert!(outputs.iter().all(|x| x.len() == 8 && x[1..].iter().all(|&x| x == 0.0)));

    Ok(())
}

#[test]
fn test_malformed_block_aborts_decode() -> anyhow::Result<()> {
    let (channel_count, block_size) = (2, 512);

    let mut raw = stream(channel_count, block_size, 40);
    raw[20 * block_size + 7] = 0x01;
    let result = decode(&raw, channel_count, block_size, Some(4));
    assert_eq!(
        result,
        Err(AdpcmError::MalformedBlockHeader {
            channel: 1,
            step_index: raw[20 * block_size + 6],
            reserved: 1
        })
    );

    let mut raw = stream(channel_count, block_size, 40);
    raw[33 * block_size + 2] = 89;
    let result = decode(&raw, channel_count, block_size, Some(4));
    assert!(matches!(result, Err(AdpcmError::MalformedBlockHeader { channel: 0, step_index: 89, .. })));

    Ok(())
}

#[test]
fn test_trailing_bytes_ignored() -> anyhow::Result<()> {
    let raw = stream(1, 68, 5);
    let mut padded = raw.clone();
    padded.extend([0xAA; 13]);

    let outputs = decode(&raw, 1, 68, Some(2))?;
    let padded_outputs = decode(&padded, 1, 68, Some(2))?;

    assert_eq!(padded_outputs[0].len(), output_len(padded.len(), 1));
    assert_eq!(padded_outputs[0][..outputs[0].len()], outputs[0][..]);
    assert!(padded_outputs[0][outputs[0].len()..].iter().all(|&x| x == 0.0));

    Ok(())
}

#[test]
fn test_samples_stay_in_range() -> anyhow::Result<()> {
    let raw = stream(4, 16 * 33, 20);

    let outputs = decode(&raw, 4, 16 * 33, None)?;

    let min = i16::MIN as f32 / i16::MAX as f32;
    assert!(outputs.iter().flatten().all(|&x| (min..=1.0).contains(&x)));

    Ok(())
}

#[test]
fn test_interleaved_signal() -> anyhow::Result<()> {
    let raw = stream(2, 64, 3);

    let outputs = decode(&raw, 2, 64, Some(2))?;
    let signal = interleave(&outputs);

    assert_eq!(signal.len(), 2 * outputs[0].len());
    assert_eq!(signal[0], outputs[0][0]);
    assert_eq!(signal[1], outputs[1][0]);
    assert_eq!(signal[41], outputs[1][20]);

    Ok(())
}
